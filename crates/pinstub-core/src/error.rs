//! # Error Types
//!
//! Structured errors for canonical encoding and CID handling, one enum per
//! operation. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.

use thiserror::Error;

/// Error during canonical encoding.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// NaN and infinities have no JSON representation.
    #[error("non-finite number cannot be canonically encoded: {0}")]
    NonFiniteNumber(f64),

    /// The value could not be represented as JSON at all
    /// (for example a map with non-string keys).
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error while parsing or validating a content identifier.
#[derive(Error, Debug)]
pub enum CidError {
    /// The string is not a well-formed CID.
    #[error("malformed CID {input:?}: {reason}")]
    Malformed { input: String, reason: String },

    /// Only CIDv1 identifiers are issued.
    #[error("unsupported CID version {0}, expected 1")]
    UnsupportedVersion(u64),

    /// Only the `raw` codec (0x55) is issued.
    #[error("unsupported codec 0x{0:x}, expected raw (0x55)")]
    UnsupportedCodec(u64),

    /// Only `sha2-256` multihashes are issued.
    #[error("unsupported multihash 0x{code:x} ({len} bytes), expected sha2-256 (0x12, 32 bytes)")]
    UnsupportedHash { code: u64, len: usize },
}
