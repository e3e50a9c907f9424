//! Single-request file upload guarded by duplicate and quota checks.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::json;
use tracing::{info, warn};

use drivehub_core::config::StorageConfig;
use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::traits::storage::{BlobStore, UploadOptions};
use drivehub_core::types::ResourceId;
use drivehub_database::{ResourceStore, UserStore};
use drivehub_entity::activity::ActivityType;
use drivehub_entity::resource::{NewResource, Resource};

use crate::activity::ActivityRecorder;
use crate::context::RequestContext;
use crate::resource::hashing::compute_file_hash;
use crate::resource::identity::{IdAndPath, generate_id_and_path};
use crate::resource::naming::validate_name;

/// Upload parameters (single request with the full file body).
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// Target folder, or `None` for the top level.
    pub parent_id: Option<ResourceId>,
    /// File name.
    pub name: String,
    /// MIME type reported by the client.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

/// Accepts file uploads.
///
/// An upload is rejected when a sibling already has the same name or the
/// same content fingerprint, or when it would take the owner over quota.
/// The object is written before the row; when the row insert fails the
/// object is removed again.
#[derive(Clone)]
pub struct UploadService {
    resources: Arc<dyn ResourceStore>,
    users: Arc<dyn UserStore>,
    blobs: Arc<dyn BlobStore>,
    activity: ActivityRecorder,
    config: StorageConfig,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService").finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        users: Arc<dyn UserStore>,
        blobs: Arc<dyn BlobStore>,
        activity: ActivityRecorder,
        config: StorageConfig,
    ) -> Self {
        Self {
            resources,
            users,
            blobs,
            activity,
            config,
        }
    }

    /// Uploads a file for the caller.
    pub async fn upload(&self, ctx: &RequestContext, params: UploadParams) -> AppResult<Resource> {
        let owner = ctx.user_id;
        let name = validate_name(&params.name)?;

        if params.data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        let size = i64::try_from(params.data.len())
            .map_err(|_| AppError::validation("File is too large"))?;

        let hash = compute_file_hash(&params.data, self.config.hash_prefix_bytes);
        let IdAndPath { id, storage_path } =
            generate_id_and_path(self.resources.as_ref(), owner, params.parent_id).await?;

        let (collision, quota) = tokio::join!(
            self.resources
                .find_collision(owner, params.parent_id, &name, &hash),
            self.users.quota(owner),
        );

        if let Some(existing) = collision? {
            let reason = if existing.name == name {
                format!("A resource named '{name}' already exists in this folder")
            } else {
                format!("This file already exists here as '{}'", existing.name)
            };
            return Err(AppError::file_already_exists(reason));
        }

        let quota = quota?;
        if quota.would_exceed(size) {
            return Err(AppError::quota_exceeded(format!(
                "Uploading {size} bytes would exceed the storage quota ({} of {} bytes used)",
                quota.used, quota.quota
            )));
        }

        self.blobs
            .upload(
                &storage_path,
                params.data,
                UploadOptions::upsert(params.mime_type.clone()),
            )
            .await
            .map_err(|e| AppError::wrap(ErrorKind::UploadFailed, "Failed to store file", e))?;

        let new = NewResource {
            id,
            owner_id: owner,
            parent_id: params.parent_id,
            name,
            is_folder: false,
            storage_path,
            mime_type: params.mime_type,
            size,
            content_hash: Some(hash),
        };

        let file = match self.resources.insert_file_charging_quota(&new).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.blobs.remove(&[new.storage_path.clone()]).await {
                    warn!(
                        user_id = %owner,
                        path = %new.storage_path,
                        error = %cleanup,
                        "Failed to remove object after rejected upload"
                    );
                }
                return Err(match e.kind {
                    ErrorKind::FileAlreadyExists | ErrorKind::StorageQuotaExceeded => e,
                    _ => AppError::wrap(ErrorKind::UploadFailed, "Failed to record upload", e),
                });
            }
        };

        info!(
            user_id = %owner,
            resource_id = %file.id,
            name = %file.name,
            size = file.size,
            "File uploaded"
        );
        self.activity
            .record(
                ctx,
                Some(file.id),
                ActivityType::Upload,
                json!({ "name": file.name, "size": file.size, "mimeType": file.mime_type }),
            )
            .await;

        Ok(file)
    }
}
