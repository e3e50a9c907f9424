//! Share management and public-link download handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use drivehub_entity::share::ResourceShare;

use crate::dto::request::CreateShareRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ClientInfo, ValidatedJson, parse_id};
use crate::state::AppState;

/// GET /api/resources/{id}/shares
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<ResourceShare>>>> {
    let id = parse_id(&id, "resource id")?;
    let shares = state.share_service.list_shares(&auth, id).await?;
    Ok(Json(ApiResponse::ok(shares)))
}

/// POST /api/resources/{id}/shares
pub async fn create_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateShareRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ResourceShare>>)> {
    let id = parse_id(&id, "resource id")?;
    let share = state
        .share_service
        .create_share(&auth, id, req.grant, req.expires_at)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(share))))
}

/// DELETE /api/shares/{id}
pub async fn revoke_share(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, "share id")?;
    state.share_service.revoke_share(&auth, id).await?;
    Ok(Json(json!({ "success": true, "message": "Share revoked" })))
}

/// GET /api/shared/{token}/{id}/download
///
/// No bearer token: the share token in the path is the credential.
pub async fn shared_download_url(
    State(state): State<AppState>,
    client: ClientInfo,
    Path((token, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, "resource id")?;
    let url = state
        .resource_service
        .shared_download_url(&token, id, client.ip_address, client.user_agent)
        .await?;
    Ok(Json(json!({ "success": true, "data": url })))
}
