//! File and folder handlers: listing, folder creation, upload, lifecycle, download links.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;
use serde_json::{Value, json};

use drivehub_core::error::AppError;
use drivehub_core::types::ResourceId;
use drivehub_entity::resource::{Resource, ResourceNode};
use drivehub_service::UploadParams;

use crate::dto::request::{CreateFolderRequest, MoveRequest, RenameRequest};
use crate::dto::response::{ApiResponse, PagedResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams, ValidatedJson, parse_id};
use crate::state::AppState;

/// GET /api/resources
pub async fn list_resources(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<PagedResponse<ResourceNode>>> {
    let page = state
        .resource_service
        .list_resources(&auth, params.into_query()?)
        .await?;
    Ok(Json(page.into()))
}

/// POST /api/resources
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Resource>>)> {
    let folder = state
        .resource_service
        .create_folder(&auth, &req.name, req.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// POST /api/resources/upload (multipart: `file`, optional `parentId`)
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<Resource>>)> {
    let mut parent_id: Option<ResourceId> = None;
    let mut file_name: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "parentId" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                let text = text.trim();
                if !text.is_empty() && text != "null" {
                    parent_id = Some(parse_id(text, "parentId")?);
                }
            }
            "file" => {
                file_name = field.file_name().map(String::from);
                mime_type = field.content_type().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::validation("file is required"))?;
    let name = file_name.ok_or_else(|| AppError::validation("file name is required"))?;

    let file = state
        .upload_service
        .upload(
            &auth,
            UploadParams {
                parent_id,
                name,
                mime_type,
                data,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file))))
}

/// GET /api/resources/{id}
pub async fn get_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Resource>>> {
    let id = parse_id(&id, "resource id")?;
    let resource = state.resource_service.get_resource(&auth, id).await?;
    Ok(Json(ApiResponse::ok(resource)))
}

/// PATCH /api/resources/{id}/rename
pub async fn rename_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<RenameRequest>,
) -> ApiResult<Json<ApiResponse<Resource>>> {
    let id = parse_id(&id, "resource id")?;
    let resource = state
        .resource_service
        .rename_resource(&auth, id, &req.name)
        .await?;
    Ok(Json(ApiResponse::ok(resource)))
}

/// PATCH /api/resources/{id}/move
pub async fn move_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<MoveRequest>,
) -> ApiResult<Json<ApiResponse<Resource>>> {
    let id = parse_id(&id, "resource id")?;
    let resource = state
        .resource_service
        .move_resource(&auth, id, req.parent_id)
        .await?;
    Ok(Json(ApiResponse::ok(resource)))
}

/// DELETE /api/resources/{id}
pub async fn delete_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Resource>>> {
    let id = parse_id(&id, "resource id")?;
    let resource = state.resource_service.delete_resource(&auth, id).await?;
    Ok(Json(ApiResponse::ok(resource)))
}

/// POST /api/resources/{id}/restore
pub async fn restore_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Resource>>> {
    let id = parse_id(&id, "resource id")?;
    let resource = state.resource_service.restore_resource(&auth, id).await?;
    Ok(Json(ApiResponse::ok(resource)))
}

/// POST /api/resources/{id}/archive
pub async fn archive_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Resource>>> {
    let id = parse_id(&id, "resource id")?;
    let resource = state.resource_service.archive_resource(&auth, id).await?;
    Ok(Json(ApiResponse::ok(resource)))
}

/// DELETE /api/resources/{id}/purge
pub async fn purge_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, "resource id")?;
    let summary = state.resource_service.purge_resource(&auth, id).await?;
    Ok(Json(json!({ "success": true, "data": summary })))
}

/// GET /api/resources/{id}/download
pub async fn download_url(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id, "resource id")?;
    let url = state.resource_service.download_url(&auth, id).await?;
    Ok(Json(json!({ "success": true, "data": url })))
}
