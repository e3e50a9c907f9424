//! Share entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use drivehub_core::error::AppError;
use drivehub_core::types::{ResourceId, ShareId, UserId};

/// Level of access a share grants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "access_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Can view and download.
    Viewer,
    /// Can view and comment.
    Commenter,
    /// Can modify.
    Editor,
}

impl AccessLevel {
    /// Return the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Commenter => "commenter",
            Self::Editor => "editor",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "commenter" => Ok(Self::Commenter),
            "editor" => Ok(Self::Editor),
            _ => Err(AppError::validation(format!(
                "Invalid access level: '{s}'. Expected one of: viewer, commenter, editor"
            ))),
        }
    }
}

/// A grant giving a user, or anyone holding a link token, access to a resource.
///
/// Public shares never name a grantee; user shares always do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResourceShare {
    /// Unique share identifier.
    pub id: ShareId,
    /// The shared resource.
    pub resource_id: ResourceId,
    /// The owner who created the share.
    pub created_by: UserId,
    /// Grantee (user shares only).
    pub granted_to: Option<UserId>,
    /// Whether this is a public link share.
    pub is_public: bool,
    /// Link token (public shares only).
    pub public_link_token: Option<String>,
    /// Level of access granted.
    pub access_level: AccessLevel,
    /// When the share stops being valid.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl ResourceShare {
    /// Whether the share is still valid at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|exp| exp > now)
    }
}

/// Who a new share is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShareGrant {
    /// Share with a specific user.
    #[serde(rename_all = "camelCase")]
    User {
        /// Grantee.
        user_id: UserId,
        /// Level of access.
        access_level: AccessLevel,
    },
    /// Share with anyone holding the generated link token.
    #[serde(rename_all = "camelCase")]
    Public {
        /// Level of access.
        access_level: AccessLevel,
    },
}

impl ShareGrant {
    /// Level of access this grant asks for.
    pub fn access_level(&self) -> AccessLevel {
        match self {
            Self::User { access_level, .. } | Self::Public { access_level } => *access_level,
        }
    }
}

/// Data required to insert a share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShare {
    /// The shared resource.
    pub resource_id: ResourceId,
    /// The owner creating the share.
    pub created_by: UserId,
    /// Grantee (user shares only).
    pub granted_to: Option<UserId>,
    /// Link token (public shares only).
    pub public_link_token: Option<String>,
    /// Level of access.
    pub access_level: AccessLevel,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewShare {
    /// Whether this is a public link share.
    pub fn is_public(&self) -> bool {
        self.granted_to.is_none()
    }
}
