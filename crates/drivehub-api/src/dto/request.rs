//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use drivehub_core::types::ResourceId;
use drivehub_entity::share::ShareGrant;

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Desired folder name; de-duplicated among siblings.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    /// Parent folder, or absent for the top level.
    #[serde(default)]
    pub parent_id: Option<ResourceId>,
}

/// Rename request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Move request body. `parentId: null` moves to the top level.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Target folder.
    #[serde(default)]
    pub parent_id: Option<ResourceId>,
}

/// Create share request body.
///
/// `{ "type": "user", "userId": "...", "accessLevel": "viewer" }` or
/// `{ "type": "public", "accessLevel": "viewer", "expiresAt": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    /// Who the share is for.
    #[serde(flatten)]
    pub grant: ShareGrant,
    /// When the share stops working.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}
