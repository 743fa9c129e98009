//! Errors raised by the pin store.

use std::path::PathBuf;

use pinstub_core::ContentId;
use thiserror::Error;

/// Error while opening, writing or reading the pin store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The content root could not be created.
    #[error("failed to initialize content root {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No object is pinned under the identifier.
    #[error("no pinned object for {0}")]
    NotFound(ContentId),

    /// The bytes on disk do not hash to the identifier they are stored under.
    #[error("integrity violation: object stored as {expected} hashes to {actual}")]
    Integrity {
        expected: ContentId,
        actual: ContentId,
    },

    /// Any other filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_names_path() {
        let err = StoreError::Init {
            path: PathBuf::from("/nonexistent/ipfs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("/nonexistent/ipfs"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn not_found_names_cid() {
        let cid = ContentId::for_bytes(b"missing");
        let msg = format!("{}", StoreError::NotFound(cid));
        assert!(msg.contains(&cid.to_string()));
    }
}
