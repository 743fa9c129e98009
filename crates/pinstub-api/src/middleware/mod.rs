//! # Middleware Stack
//!
//! Tower middleware for the API layer:
//! - [`access_log`]: one structured log line per request.
//! - [`static_files`]: keeps dot-files out of the static fallback.

pub mod access_log;
pub mod static_files;
