//! Resource entity model.
//!
//! Files and folders share one table. The persisted `status` and
//! `deleted_at` columns are folded into a single [`ResourceState`] when a
//! row is loaded, so a deleted resource always carries its deletion time
//! and nothing else does.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use drivehub_core::error::AppError;
use drivehub_core::types::{ResourceId, UserId};

/// Persisted lifecycle status of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    /// Visible and usable.
    Active,
    /// Soft-deleted; restorable until purged.
    Deleted,
    /// Hidden from normal listings but kept.
    Archived,
}

impl ResourceStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "deleted" => Ok(Self::Deleted),
            "archived" => Ok(Self::Archived),
            _ => Err(AppError::validation(format!(
                "Invalid resource status: '{s}'. Expected one of: active, deleted, archived"
            ))),
        }
    }
}

/// Lifecycle state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "deletedAt", rename_all = "lowercase")]
pub enum ResourceState {
    /// Visible and usable.
    Active,
    /// Soft-deleted at the given time.
    Deleted(DateTime<Utc>),
    /// Archived.
    Archived,
}

impl ResourceState {
    /// The persisted status column value.
    pub fn status(&self) -> ResourceStatus {
        match self {
            Self::Active => ResourceStatus::Active,
            Self::Deleted(_) => ResourceStatus::Deleted,
            Self::Archived => ResourceStatus::Archived,
        }
    }

    /// The persisted `deleted_at` column value.
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Deleted(at) => Some(*at),
            _ => None,
        }
    }

    /// Whether the resource is active.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the resource is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }

    /// Rebuild the state from its two persisted columns.
    ///
    /// Fails when the columns disagree: `deleted` without a timestamp,
    /// or a timestamp on a non-deleted row.
    pub fn from_columns(
        status: ResourceStatus,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<Self, AppError> {
        match (status, deleted_at) {
            (ResourceStatus::Active, None) => Ok(Self::Active),
            (ResourceStatus::Archived, None) => Ok(Self::Archived),
            (ResourceStatus::Deleted, Some(at)) => Ok(Self::Deleted(at)),
            (ResourceStatus::Deleted, None) => Err(AppError::internal(
                "Resource is marked deleted but has no deletion time",
            )),
            (status, Some(_)) => Err(AppError::internal(format!(
                "Resource with status '{status}' must not have a deletion time"
            ))),
        }
    }
}

/// Raw `resources` table row.
#[derive(Debug, Clone, FromRow)]
pub struct ResourceRow {
    /// Unique resource identifier.
    pub id: ResourceId,
    /// The owning user.
    pub owner_id: UserId,
    /// Parent folder (null for top-level).
    pub parent_id: Option<ResourceId>,
    /// Display name, unique among active siblings.
    pub name: String,
    /// Whether this is a folder.
    pub is_folder: bool,
    /// Blob storage key; mirrors the folder hierarchy.
    pub storage_path: String,
    /// MIME type (files only).
    pub mime_type: Option<String>,
    /// Size in bytes (0 for folders).
    pub size: i64,
    /// SHA-256 hex of the content prefix (files only).
    pub content_hash: Option<String>,
    /// Lifecycle status column.
    pub status: ResourceStatus,
    /// When the resource was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the resource was created.
    pub created_at: DateTime<Utc>,
    /// When the resource was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A file or folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Unique resource identifier.
    pub id: ResourceId,
    /// The owning user.
    pub owner_id: UserId,
    /// Parent folder (None for top-level).
    pub parent_id: Option<ResourceId>,
    /// Display name.
    pub name: String,
    /// Whether this is a folder.
    pub is_folder: bool,
    /// Blob storage key.
    pub storage_path: String,
    /// MIME type (files only).
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size: i64,
    /// Content fingerprint (files only).
    pub content_hash: Option<String>,
    /// Lifecycle state.
    #[serde(flatten)]
    pub state: ResourceState,
    /// When the resource was created.
    pub created_at: DateTime<Utc>,
    /// When the resource was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// Whether this is a top-level resource.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether this is a file.
    pub fn is_file(&self) -> bool {
        !self.is_folder
    }

    /// Blob key of the placeholder object that keeps an empty folder visible in storage.
    pub fn placeholder_path(&self) -> String {
        folder_placeholder_path(&self.storage_path)
    }
}

impl TryFrom<ResourceRow> for Resource {
    type Error = AppError;

    fn try_from(row: ResourceRow) -> Result<Self, Self::Error> {
        let state = ResourceState::from_columns(row.status, row.deleted_at)
            .map_err(|e| AppError::internal(format!("Resource {}: {}", row.id, e.message)))?;
        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            parent_id: row.parent_id,
            name: row.name,
            is_folder: row.is_folder,
            storage_path: row.storage_path,
            mime_type: row.mime_type,
            size: row.size,
            content_hash: row.content_hash,
            state,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Blob key of a folder's placeholder object.
pub fn folder_placeholder_path(storage_path: &str) -> String {
    format!("{storage_path}/.emptyFolderPlaceholder")
}

/// Data required to insert a new resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    /// Pre-generated identifier (also the last storage path segment).
    pub id: ResourceId,
    /// The owning user.
    pub owner_id: UserId,
    /// Parent folder.
    pub parent_id: Option<ResourceId>,
    /// Display name.
    pub name: String,
    /// Whether this is a folder.
    pub is_folder: bool,
    /// Blob storage key.
    pub storage_path: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size: i64,
    /// Content fingerprint.
    pub content_hash: Option<String>,
}

impl NewResource {
    /// Materialize the resource as it will look right after insertion.
    pub fn into_resource(self, now: DateTime<Utc>) -> Resource {
        Resource {
            id: self.id,
            owner_id: self.owner_id,
            parent_id: self.parent_id,
            name: self.name,
            is_folder: self.is_folder,
            storage_path: self.storage_path,
            mime_type: self.mime_type,
            size: self.size,
            content_hash: self.content_hash,
            state: ResourceState::Active,
            created_at: now,
            updated_at: now,
        }
    }
}
