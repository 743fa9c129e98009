//! # pinstub-core — Content Addressing Primitives
//!
//! The leaf crate of the pinstub workspace. It owns the two pure
//! transformations the ingestion pipeline is built on:
//!
//! 1. **`CanonicalBytes`**: the only way to turn a JSON value into bytes
//!    that get addressed. Equal values always produce equal bytes,
//!    regardless of the order object keys were inserted in.
//!
//! 2. **`ContentId`**: a CIDv1 (`raw` codec, `sha2-256` multihash,
//!    base32-lower text) derived from any byte sequence.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pinstub-*` crates.
//! - No I/O. Persistence lives in `pinstub-store`.
//! - No `.unwrap()` outside tests. `.expect()` only where the types rule
//!   failure out, with the reason as its message (a 32-byte SHA-256
//!   digest always fits a 64-byte multihash).

pub mod canonical;
pub mod cid;
pub mod error;

pub use canonical::CanonicalBytes;
pub use cid::{ContentId, RAW_CODEC, SHA2_256_CODE};
pub use error::{CanonicalizationError, CidError};
