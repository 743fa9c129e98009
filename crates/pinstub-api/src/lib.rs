//! # pinstub-api — Development Pinning Service
//!
//! An Axum service that mimics a content-pinning API closely enough for
//! applications to be developed and tested against it offline. Submitted
//! JSON documents and files are addressed by CIDv1 and written to a local
//! directory that is also served as static files.
//!
//! ## API Surface
//!
//! | Method | Path                       | Auth | Handler                         |
//! |--------|----------------------------|------|---------------------------------|
//! | GET    | `/`                        | no   | [`index`]                       |
//! | POST   | `/pinning/pinJSONToIPFS`   | yes  | [`routes::pinning::pin_json`]   |
//! | POST   | `/pinning/pinFileToIPFS`   | yes  | [`routes::pinning::pin_file`]   |
//! | *      | anything else              | no   | static file from the public root |
//!
//! Paths with a segment starting with `.` are answered 404 by the fallback.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! AccessLog → TraceLayer → Cors → [pinning only: Auth → BodyLimit] → Handler
//!                                  [fallback only: HideDotFiles] → ServeDir
//! ```

pub mod auth;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::header;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Unmatched paths fall through to files under the public root; that
/// includes pinned objects at `/ipfs/<cid>`. Dot-files, which include the
/// store's in-flight writes, are never served.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig::new(state.config.auth_token.clone());

    // Route layers only wrap matched methods, so a wrong method gets 405
    // rather than an auth challenge. The tower-http limit replaces axum's
    // default 2 MB extractor cap and rejects an oversized Content-Length
    // before the handler runs.
    let pinning = routes::pinning::router()
        .route_layer(DefaultBodyLimit::disable())
        .route_layer(RequestBodyLimitLayer::new(state.config.max_upload_bytes))
        .route_layer(from_fn(auth::auth_middleware))
        .layer(Extension(auth_config));

    let static_files = from_fn(middleware::static_files::hide_dot_files)
        .layer(ServeDir::new(&state.config.public_root));

    Router::new()
        .route("/", get(index))
        .merge(pinning)
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(middleware::access_log::access_log))
        .with_state(state)
}

/// GET /
pub async fn index() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Hello World",
    )
}
