//! Serves blobs behind signed download links.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use serde::Deserialize;

use drivehub_core::error::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Signature parameters of a download link.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedParams {
    /// Unix time after which the link is rejected.
    pub expires: i64,
    /// Hex signature over the path and expiry.
    pub signature: String,
}

/// GET /blobs/{*path}?expires=...&signature=...
pub async fn serve_blob(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<SignedParams>,
) -> ApiResult<Response> {
    if !state
        .storage
        .signer()
        .verify(&path, params.expires, &params.signature)
    {
        return Err(AppError::authorization("Download link is invalid or has expired").into());
    }

    let data = state.storage.store().read(&path).await?;
    let file_name = path.rsplit('/').next().unwrap_or("download");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from(data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
