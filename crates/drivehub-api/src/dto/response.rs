//! Response DTOs.

use serde::{Deserialize, Serialize};

use drivehub_core::types::{PageMeta, Paged};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Paginated response wrapper: `{ success, data, meta }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Items in this page.
    pub data: Vec<T>,
    /// Paging metadata.
    pub meta: PageMeta,
}

impl<T: Serialize> From<Paged<T>> for PagedResponse<T> {
    fn from(page: Paged<T>) -> Self {
        Self {
            success: true,
            data: page.data,
            meta: page.meta,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall status.
    pub status: String,
    /// Database status.
    pub database: String,
    /// Storage status.
    pub storage: String,
}
