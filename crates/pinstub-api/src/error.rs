//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Client errors carry their detail in a plain-text body. Internal errors
//! are logged with their full cause and answered with `server error`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pinstub_core::CanonicalizationError;
use pinstub_store::StoreError;
use thiserror::Error;

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The body overran the upload cap while being read (413).
    #[error("payload too large")]
    PayloadTooLarge,

    /// Canonical encoding of the submitted document failed (500).
    #[error("canonical encoding failed: {0}")]
    Encoding(#[from] CanonicalizationError),

    /// The pin store could not persist the object (500).
    #[error("pin store failure: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Return the HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Encoding(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Never expose internal error messages to clients.
        let body = if status.is_server_error() {
            tracing::error!(error = %self, "internal server error");
            "server error".to_string()
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "rejected request");
            self.to_string()
        };

        (status, body).into_response()
    }
}
