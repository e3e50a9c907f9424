//! Listing defaults.

use serde::{Deserialize, Serialize};

/// Page size defaults applied when normalizing list requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the client omits `limit`.
    #[serde(default = "default_limit")]
    pub default_limit: i64,
    /// Upper bound for `limit`.
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> i64 {
    10
}

fn default_max_limit() -> i64 {
    100
}
