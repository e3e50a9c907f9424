//! The calling user's account and storage usage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use drivehub_core::result::AppResult;
use drivehub_core::traits::storage::BlobStore;
use drivehub_database::UserStore;
use drivehub_entity::user::User;

use crate::context::RequestContext;

/// Storage usage of the calling user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    /// Quota in bytes.
    pub quota_bytes: i64,
    /// Bytes in use.
    pub used_bytes: i64,
    /// Bytes still available.
    pub available_bytes: i64,
    /// Used share of the quota, as a percentage.
    pub usage_percent: f64,
    /// Blob store backend name.
    pub provider: String,
}

/// Reports quota and usage.
#[derive(Clone)]
pub struct StorageService {
    users: Arc<dyn UserStore>,
    blobs: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService")
            .field("provider", &self.blobs.provider_type())
            .finish()
    }
}

impl StorageService {
    /// Creates a new storage service.
    pub fn new(users: Arc<dyn UserStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { users, blobs }
    }

    /// Quota and usage of the caller.
    pub async fn usage(&self, ctx: &RequestContext) -> AppResult<StorageUsage> {
        let quota = self.users.quota(ctx.user_id).await?;
        Ok(StorageUsage {
            quota_bytes: quota.quota,
            used_bytes: quota.used,
            available_bytes: quota.available(),
            usage_percent: quota.usage_percent(),
            provider: self.blobs.provider_type().to_string(),
        })
    }

    /// Account row of the caller.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users.profile(ctx.user_id).await
    }
}
