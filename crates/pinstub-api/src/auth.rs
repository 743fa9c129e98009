//! # Authentication Middleware
//!
//! A single shared bearer token guards the pinning routes. The index and
//! the static fallback are unauthenticated.
//!
//! ## Credential Extraction
//!
//! The `Authorization` header value has a leading `Bearer` removed and
//! surrounding whitespace trimmed. `Bearer development-token` and a bare
//! `development-token` are therefore both accepted.
//!
//! ## Denial
//!
//! A missing or wrong credential short-circuits with `401` and a plain-text
//! body naming the expected development token. The wrapped handler never
//! runs, so nothing is read from the body and nothing is pinned.

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    token: String,
}

impl AuthConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The expected bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Constant-time comparison of bearer tokens.
///
/// When lengths differ, performs a dummy comparison so that a length
/// mismatch costs the same as a content mismatch.
pub fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Strip an optional leading `Bearer` and surrounding whitespace.
pub fn extract_bearer_token(header_value: &str) -> &str {
    header_value
        .strip_prefix("Bearer")
        .unwrap_or(header_value)
        .trim()
}

/// Reject requests whose bearer token does not match [`AuthConfig`].
///
/// Fails closed: without an `AuthConfig` extension every request is
/// refused.
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let Some(config) = request.extensions().get::<AuthConfig>().cloned() else {
        tracing::error!("auth middleware mounted without AuthConfig extension");
        return (StatusCode::INTERNAL_SERVER_ERROR, "server error").into_response();
    };

    let outcome = match request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map(extract_bearer_token))
    {
        None => Err("missing authorization header"),
        Some(Err(_)) => Err("authorization header is not valid ASCII"),
        Some(Ok(provided)) if constant_time_token_eq(provided, config.token()) => Ok(()),
        Some(Ok(_)) => Err("invalid bearer token"),
    };

    match outcome {
        Ok(()) => next.run(request).await,
        Err(reason) => {
            tracing::warn!(
                %reason,
                path = %request.uri().path(),
                "authentication failed"
            );
            denied_response(config.token())
        }
    }
}

fn denied_response(expected: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        format!("access denied, you are not using the development auth token: {expected}"),
    )
        .into_response()
}
