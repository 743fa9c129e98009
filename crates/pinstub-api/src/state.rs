//! # Application State
//!
//! Shared state for the Axum application, passed to route handlers via the
//! `State` extractor. Built once in `main` and never mutated afterwards:
//! the configuration is behind an `Arc` and the pin store handle is itself
//! a cheap clone.

use std::path::PathBuf;
use std::sync::Arc;

use pinstub_store::PinStore;

/// Bearer token accepted when none is configured.
pub const DEFAULT_AUTH_TOKEN: &str = "development-token";

/// Default cap on an ingestion request body (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 << 20;

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Directory served as the static fallback. Pinned objects live in its
    /// `ipfs` subdirectory.
    pub public_root: PathBuf,
    /// The single shared bearer token.
    pub auth_token: String,
    /// Largest request body the pinning routes accept.
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Configuration with default token and upload cap.
    pub fn new(port: u16, public_root: impl Into<PathBuf>) -> Self {
        Self {
            port,
            public_root: public_root.into(),
            auth_token: DEFAULT_AUTH_TOKEN.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("public_root", &self.public_root)
            .field("auth_token", &"[REDACTED]")
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: PinStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: PinStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
