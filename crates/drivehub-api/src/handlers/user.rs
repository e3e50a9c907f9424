//! Current user handler.

use axum::Json;
use axum::extract::State;

use drivehub_entity::user::User;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.storage_service.profile(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}
