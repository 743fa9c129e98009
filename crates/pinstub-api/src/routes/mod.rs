//! # API Route Modules
//!
//! - `pinning`: JSON and file ingestion behind the auth gate.

pub mod pinning;
