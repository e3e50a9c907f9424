//! Blob store trait for pluggable object storage backends.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Options for [`BlobStore::upload`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// MIME type stored with the object, when the backend supports it.
    pub content_type: Option<String>,
    /// Overwrite an existing object at the same path instead of failing.
    pub upsert: bool,
}

impl UploadOptions {
    /// Upsert-mode upload with the given content type.
    pub fn upsert(content_type: Option<String>) -> Self {
        Self {
            content_type,
            upsert: true,
        }
    }
}

/// A time-limited download link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    /// The URL the client fetches.
    pub signed_url: String,
    /// When the link stops working.
    pub expires_at: DateTime<Utc>,
}

/// Trait for blob storage backends.
///
/// Paths are `/`-separated keys relative to the store root, e.g.
/// `user_{owner}/{folder}/{file}`. Implementations live in
/// `drivehub-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. `"local"`, `"s3"`).
    fn provider_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store `data` at `path` and return the stored path.
    ///
    /// Fails with a conflict when the object exists and `upsert` is false.
    async fn upload(&self, path: &str, data: Bytes, options: UploadOptions) -> AppResult<String>;

    /// Read the whole object at `path`. Fails with `NotFound` when absent.
    async fn read(&self, path: &str) -> AppResult<Bytes>;

    /// Remove every listed object. Missing objects are not an error.
    async fn remove(&self, paths: &[String]) -> AppResult<()>;

    /// Move a single object from one path to another.
    async fn move_object(&self, from: &str, to: &str) -> AppResult<()>;

    /// Create a download link for `path` valid for `expires_in`.
    async fn create_signed_url(&self, path: &str, expires_in: Duration) -> AppResult<SignedUrl>;

    /// Check whether an object exists at `path`.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
