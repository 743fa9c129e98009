//! # Static File Guard
//!
//! Wraps the static fallback so that no path segment starting with `.` is
//! ever served. The pin store stages in-flight writes as dot-files inside
//! the published content directory; they must not be readable before the
//! rename that makes them a pinned object.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Axum middleware answering 404 for hidden paths.
pub async fn hide_dot_files(request: Request, next: Next) -> Response {
    if is_hidden_path(request.uri().path()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

/// True if any segment of the raw (still percent-encoded) path names a
/// dot-file once decoded.
fn is_hidden_path(path: &str) -> bool {
    path.split('/').any(|segment| {
        segment.starts_with('.')
            || segment
                .get(..3)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("%2e"))
    })
}
