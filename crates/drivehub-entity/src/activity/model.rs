//! Activity log entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use drivehub_core::error::AppError;
use drivehub_core::types::{ActivityLogId, ResourceId, UserId};

/// What a user did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    /// Folder created.
    Create,
    /// File uploaded.
    Upload,
    /// Download link issued.
    Download,
    /// Generic update.
    Update,
    /// Resource renamed.
    Rename,
    /// Resource moved to another parent.
    Move,
    /// Share created.
    Share,
    /// Share revoked.
    Unshare,
    /// Resource soft-deleted.
    Delete,
    /// Resource restored.
    Restore,
    /// Resource archived.
    Archive,
    /// Resource permanently removed.
    Purge,
}

impl ActivityType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Upload => "upload",
            Self::Download => "download",
            Self::Update => "update",
            Self::Rename => "rename",
            Self::Move => "move",
            Self::Share => "share",
            Self::Unshare => "unshare",
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::Archive => "archive",
            Self::Purge => "purge",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_lowercase().as_str() {
            "create" => Self::Create,
            "upload" => Self::Upload,
            "download" => Self::Download,
            "update" => Self::Update,
            "rename" => Self::Rename,
            "move" => Self::Move,
            "share" => Self::Share,
            "unshare" => Self::Unshare,
            "delete" => Self::Delete,
            "restore" => Self::Restore,
            "archive" => Self::Archive,
            "purge" => Self::Purge,
            _ => {
                return Err(AppError::validation(format!(
                    "Invalid activity type: '{s}'"
                )));
            }
        };
        Ok(kind)
    }
}

/// A recorded user action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    /// Unique entry identifier.
    pub id: ActivityLogId,
    /// The acting user.
    pub user_id: UserId,
    /// The resource acted on; cleared when the resource is purged.
    pub resource_id: Option<ResourceId>,
    /// What happened.
    pub activity_type: ActivityType,
    /// Action-specific details.
    pub details: serde_json::Value,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// When it happened.
    pub created_at: DateTime<Utc>,
}

/// Data required to record an activity.
#[derive(Debug, Clone)]
pub struct NewActivity {
    /// The acting user.
    pub user_id: UserId,
    /// The resource acted on.
    pub resource_id: Option<ResourceId>,
    /// What happened.
    pub activity_type: ActivityType,
    /// Action-specific details.
    pub details: serde_json::Value,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
}
