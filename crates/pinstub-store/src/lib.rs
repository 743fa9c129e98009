//! # pinstub-store — Pin Store
//!
//! Persists pinned objects on the local filesystem at
//! `<public-root>/ipfs/<cid>`. Objects are immutable once written: a
//! second `put` of the same CID is a no-op, and a write is published by
//! renaming a fully written temp file into place, so a reader never sees
//! a partial object.
//!
//! All I/O goes through `tokio::fs`.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{PinStore, PinnedObject, CONTENT_DIR};
