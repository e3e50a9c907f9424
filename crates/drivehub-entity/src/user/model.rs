//! User entity model and the storage quota value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use drivehub_core::types::UserId;

/// A user account, seen from the storage side.
///
/// Credentials and profile data are managed elsewhere; this service only
/// reads and adjusts the quota columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Maximum bytes the user may store.
    pub storage_quota: i64,
    /// Bytes currently charged to the user.
    pub used_storage: i64,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The user's quota as a value object.
    pub fn quota(&self) -> StorageQuota {
        StorageQuota::new(self.storage_quota, self.used_storage)
    }
}

/// Quota and usage of a single owner, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageQuota {
    /// Maximum bytes.
    pub quota: i64,
    /// Bytes in use.
    pub used: i64,
}

impl StorageQuota {
    /// Create a quota view.
    pub fn new(quota: i64, used: i64) -> Self {
        Self { quota, used }
    }

    /// Whether accepting `incoming` more bytes would go over the quota.
    ///
    /// Reaching the quota exactly is allowed.
    pub fn would_exceed(&self, incoming: i64) -> bool {
        match self.used.checked_add(incoming) {
            Some(total) => total > self.quota,
            None => true,
        }
    }

    /// Bytes still available (never negative).
    pub fn available(&self) -> i64 {
        (self.quota - self.used).max(0)
    }

    /// Used share of the quota, as a percentage.
    pub fn usage_percent(&self) -> f64 {
        if self.quota <= 0 {
            return 100.0;
        }
        (self.used as f64 / self.quota as f64) * 100.0
    }
}
