//! Storage usage handler.

use axum::Json;
use axum::extract::State;

use drivehub_service::StorageUsage;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/storage/usage
pub async fn usage(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<StorageUsage>>> {
    let usage = state.storage_service.usage(&auth).await?;
    Ok(Json(ApiResponse::ok(usage)))
}
