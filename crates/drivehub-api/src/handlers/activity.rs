//! Activity log handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use drivehub_entity::activity::ActivityLog;

use crate::dto::response::PagedResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, parse_id};
use crate::state::AppState;

/// GET /api/activity
pub async fn list_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<PagedResponse<ActivityLog>>> {
    let page = state
        .activity_service
        .list_own(&auth, params.into_query()?)
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/resources/{id}/activity
pub async fn list_resource_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<PagedResponse<ActivityLog>>> {
    let id = parse_id(&id, "resource id")?;
    let page = state
        .activity_service
        .list_for_resource(&auth, id, params.into_query()?)
        .await?;
    Ok(Json(page.into()))
}
