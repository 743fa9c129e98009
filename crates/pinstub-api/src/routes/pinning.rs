//! # Pinning Routes
//!
//! `POST /pinning/pinJSONToIPFS` and `POST /pinning/pinFileToIPFS`.
//!
//! Both routes normalize the submission to a byte sequence, address it,
//! pin it, and answer with a [`PinResponse`]:
//!
//! ```text
//! JSON: body ─► envelope.pinataContent ─► CanonicalBytes ─┐
//! File: multipart part "file" ─────────────────────────────┴─► ContentId ─► PinStore::put
//! ```

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::BytesRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use pinstub_core::{CanonicalBytes, ContentId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

/// Name of the multipart part carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Envelope accepted by the JSON pinning route.
///
/// Other envelope members (`pinataMetadata`, `pinataOptions`, ...) are
/// accepted and ignored. A missing `pinataContent` pins JSON `null`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinJsonRequest {
    #[serde(default)]
    pub pinata_content: Value,
}

/// Acknowledgement returned by both pinning routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinResponse {
    pub ipfs_hash: ContentId,
    /// Byte length of the pinned object.
    pub pin_size: u64,
    /// RFC 3339, UTC, whole seconds.
    pub timestamp: String,
}

/// Build the pinning router. Auth and the body limit are layered on by
/// [`crate::app`].
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pinning/pinJSONToIPFS", post(pin_json))
        .route("/pinning/pinFileToIPFS", post(pin_file))
}

/// POST /pinning/pinJSONToIPFS
///
/// The body is parsed as JSON whatever its `Content-Type`.
pub async fn pin_json(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PinResponse>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    })?;

    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))?;
    if !value.is_object() {
        return Err(AppError::BadRequest(
            "pin request must be a JSON object".to_string(),
        ));
    }
    let request: PinJsonRequest = serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("invalid pin request: {e}")))?;

    let canonical = CanonicalBytes::from_value(&request.pinata_content)?;
    pin_bytes(&state, canonical.as_bytes()).await.map(Json)
}

/// POST /pinning/pinFileToIPFS
///
/// Pins the first part named `file` that carries a filename. Other parts
/// are skipped.
pub async fn pin_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PinResponse>, AppError> {
    let mut multipart = multipart.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
            continue;
        }
        let data = field.bytes().await.map_err(multipart_error)?;
        return pin_bytes(&state, &data).await.map(Json);
    }

    Err(AppError::BadRequest(format!(
        "missing file part {FILE_FIELD:?}"
    )))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(err.body_text())
    }
}

/// Address, pin and acknowledge a normalized submission.
async fn pin_bytes(state: &AppState, bytes: &[u8]) -> Result<PinResponse, AppError> {
    let cid = ContentId::for_bytes(bytes);
    let pinned = state.store.put(&cid, bytes).await?;

    tracing::info!(
        %cid,
        size = pinned.size,
        newly_pinned = pinned.newly_pinned,
        "pinned object"
    );

    Ok(PinResponse {
        ipfs_hash: cid,
        pin_size: pinned.size,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}
