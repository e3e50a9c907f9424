//! Filter types for list endpoints.

use serde::{Deserialize, Serialize};

/// A single client-supplied filter: a field key and its raw string value.
///
/// Keys are resolved against a per-listing field map in the database
/// crate; keys that are not in the map are dropped there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Field key as exposed by the API (e.g. `"isFolder"`).
    pub id: String,
    /// Raw value, coerced by the field's transform.
    pub value: String,
}

impl Filter {
    /// Create a new filter.
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}
