//! # Canonical Encoding — Deterministic JSON Bytes
//!
//! This module defines `CanonicalBytes`, the sole construction path for the
//! bytes that a pinned JSON document is addressed and stored under.
//!
//! ## Invariant
//!
//! `CanonicalBytes` has a private inner field. The only ways to build one
//! are [`CanonicalBytes::new`] and [`CanonicalBytes::from_value`], both of
//! which run the encoder below. Any code that needs addressable JSON bytes
//! must go through them, so two logically equal documents can never end up
//! under two different CIDs.
//!
//! ## Encoding Rules
//!
//! 1. **Sorted keys**: object members are written in lexicographic byte
//!    order of their keys, whatever order the map was built in.
//! 2. **Compact**: no whitespace between tokens.
//! 3. **Line terminated**: the document ends with a single `\n`, the
//!    line-delimited form the mocked pinning service hashes.
//! 4. **HTML-safe strings**: `<`, `>`, `&`, U+2028 and U+2029 are written
//!    as `\u` escapes; control characters use the short escapes where JSON
//!    has one and `\u00xx` otherwise.
//! 5. **Numbers**: integers verbatim. Floats holding an integral value in
//!    the `i64` range are written as integers (`1.0` and `1` address the
//!    same content). Other finite floats use the shortest digits that
//!    round-trip, in plain decimal when `1e-6 <= |f| < 1e21` and in
//!    exponent form otherwise (`1e+21`, `1e-7`: signed exponent, no
//!    leading zeros). NaN and infinities are rejected.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by the canonical JSON encoder.
///
/// # Invariants
///
/// - Object keys are sorted by byte order at every nesting level.
/// - There is no insignificant whitespace, and exactly one trailing `\n`.
/// - The bytes are valid UTF-8 and parse back to the encoded value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonically encode any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value has
    /// no JSON representation, and `NonFiniteNumber` for NaN or infinities.
    pub fn new<T: Serialize + ?Sized>(obj: &T) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(&value)
    }

    /// Canonically encode an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self, CanonicalizationError> {
        let mut out = Vec::with_capacity(64);
        write_value(&mut out, value)?;
        out.push(b'\n');
        Ok(Self(out))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the wrapper and return the owned bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    ///
    /// Never true for an encoded document, which always carries at least
    /// one token and the line terminator.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => write_number(out, n)?,
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(out, item)?;
            }
            out.push(b']');
        }
        Value::Object(map) => write_object(out, map)?,
    }
    Ok(())
}

fn write_object(out: &mut Vec<u8>, map: &Map<String, Value>) -> Result<(), CanonicalizationError> {
    // Sort explicitly: with serde_json's `preserve_order` feature the map
    // iterates in insertion order.
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_unstable_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    out.push(b'{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        write_string(out, key);
        out.push(b':');
        write_value(out, value)?;
    }
    out.push(b'}');
    Ok(())
}

fn write_number(out: &mut Vec<u8>, n: &Number) -> Result<(), CanonicalizationError> {
    if let Some(i) = n.as_i64() {
        out.extend_from_slice(i.to_string().as_bytes());
        return Ok(());
    }
    if let Some(u) = n.as_u64() {
        out.extend_from_slice(u.to_string().as_bytes());
        return Ok(());
    }

    let f = n.as_f64().unwrap_or(f64::NAN);
    if !f.is_finite() {
        return Err(CanonicalizationError::NonFiniteNumber(f));
    }
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        // `as` saturates, and the range check keeps it exact. -0.0 becomes 0.
        out.extend_from_slice((f as i64).to_string().as_bytes());
        return Ok(());
    }
    write_float(out, f);
    Ok(())
}

/// Shortest round-trip digits, switching to exponent form outside
/// `[1e-6, 1e21)` the way the mocked service's encoder does.
fn write_float(out: &mut Vec<u8>, f: f64) {
    let abs = f.abs();
    if (1e-6..1e21).contains(&abs) {
        // f64 `Display` never switches to exponent notation.
        out.extend_from_slice(f.to_string().as_bytes());
        return;
    }
    let text = format!("{f:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => {
            out.extend_from_slice(mantissa.as_bytes());
            out.extend_from_slice(b"e+");
            out.extend_from_slice(exp.as_bytes());
        }
        _ => out.extend_from_slice(text.as_bytes()),
    }
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    out.push(b'"');
    for c in s.chars() {
        match c {
            '"' => out.extend_from_slice(b"\\\""),
            '\\' => out.extend_from_slice(b"\\\\"),
            '\u{08}' => out.extend_from_slice(b"\\b"),
            '\u{0c}' => out.extend_from_slice(b"\\f"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\t' => out.extend_from_slice(b"\\t"),
            '<' | '>' | '&' | '\u{2028}' | '\u{2029}' => write_unicode_escape(out, c),
            c if (c as u32) < 0x20 => write_unicode_escape(out, c),
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    out.push(b'"');
}

fn write_unicode_escape(out: &mut Vec<u8>, c: char) {
    out.extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
}
