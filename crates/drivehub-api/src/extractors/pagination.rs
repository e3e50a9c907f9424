//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use drivehub_core::error::AppError;
use drivehub_core::types::{Filter, OrderBy, PaginationQuery};

/// Query parameters for paginated endpoints.
///
/// `order` and `filters` arrive as JSON strings, e.g.
/// `order=[{"id":"name","desc":false}]&filters=[{"id":"isFolder","value":"true"}]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-based).
    pub page: Option<i64>,
    /// Items per page, `-1` for all.
    pub limit: Option<i64>,
    /// Row offset; wins over `page` when non-zero.
    pub offset: Option<i64>,
    /// Whether to compute `totalCount`.
    pub include_total: Option<bool>,
    /// JSON array of `{ id, desc }`.
    pub order: Option<String>,
    /// JSON array of `{ id, value }`.
    pub filters: Option<String>,
}

impl PaginationParams {
    /// Converts to a `PaginationQuery`, decoding the JSON-valued parameters.
    ///
    /// `page` must be at least 1 and `offset` at least 0.
    pub fn into_query(self) -> Result<PaginationQuery, AppError> {
        if self.page.is_some_and(|page| page < 1) {
            return Err(AppError::validation("'page' must be at least 1"));
        }
        if self.offset.is_some_and(|offset| offset < 0) {
            return Err(AppError::validation("'offset' must not be negative"));
        }

        Ok(PaginationQuery {
            page: self.page,
            limit: self.limit,
            offset: self.offset,
            order: parse_json_list::<OrderBy>("order", self.order.as_deref())?,
            filters: parse_json_list::<Filter>("filters", self.filters.as_deref())?,
            include_total: self.include_total.unwrap_or(false),
        })
    }
}

fn parse_json_list<T: serde::de::DeserializeOwned>(
    name: &str,
    raw: Option<&str>,
) -> Result<Vec<T>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AppError::validation(format!("Invalid '{name}' parameter: {e}"))),
    }
}
