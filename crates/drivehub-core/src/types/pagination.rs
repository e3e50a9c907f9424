//! Pagination types for list endpoints.
//!
//! A listing request arrives as a [`PaginationQuery`] with every field
//! optional. [`PaginationQuery::normalize`] resolves it into a
//! [`PageRequest`] whose page and offset agree with each other, and
//! [`PageMeta`] reports back what was applied.

use serde::{Deserialize, Serialize};

use crate::config::pagination::PaginationConfig;
use crate::types::filter::Filter;
use crate::types::sorting::OrderBy;

/// Sentinel `limit` meaning "return every matching item".
pub const ALL_ITEMS: i64 = -1;

/// Largest offset PostgreSQL accepts.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Raw pagination parameters as supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    /// Page number (1-based).
    pub page: Option<i64>,
    /// Items per page, or `-1` for all items.
    pub limit: Option<i64>,
    /// Explicit row offset. Takes precedence over `page` when non-zero.
    pub offset: Option<i64>,
    /// Requested sort order.
    #[serde(default)]
    pub order: Vec<OrderBy>,
    /// Requested filters.
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Whether to run the COUNT query.
    #[serde(default)]
    pub include_total: bool,
}

impl PaginationQuery {
    /// Normalize using the built-in defaults (limit 10, max 100).
    pub fn normalize(self) -> PageRequest {
        self.normalize_with(&PaginationConfig::default())
    }

    /// Normalize into a consistent [`PageRequest`].
    ///
    /// - `limit = -1` disables paging: page 1, offset 0.
    /// - otherwise `limit` is clamped to `[1, max_limit]`; a non-zero
    ///   `offset` derives `page = offset / limit + 1`, else
    ///   `offset = (page - 1) * limit`, saturating at `i64::MAX`.
    pub fn normalize_with(self, config: &PaginationConfig) -> PageRequest {
        let raw_limit = self.limit.unwrap_or(config.default_limit);

        let (page, limit, offset) = if raw_limit == ALL_ITEMS {
            (1, None, 0)
        } else {
            let limit = raw_limit.clamp(1, config.max_limit.max(1)) as u64;
            let offset = self.offset.unwrap_or(0).max(0) as u64;
            if offset == 0 {
                let page = self.page.unwrap_or(1).max(1) as u64;
                let offset = (page - 1).saturating_mul(limit).min(MAX_OFFSET);
                (page, Some(limit), offset)
            } else {
                (offset / limit + 1, Some(limit), offset)
            }
        };

        PageRequest {
            page,
            limit,
            offset,
            order: self.order,
            filters: self.filters,
            include_total: self.include_total,
        }
    }
}

/// A normalized pagination request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Items per page; `None` when every item was requested.
    pub limit: Option<u64>,
    /// Row offset.
    pub offset: u64,
    /// Requested sort order.
    pub order: Vec<OrderBy>,
    /// Requested filters.
    pub filters: Vec<Filter>,
    /// Whether to run the COUNT query.
    pub include_total: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        PaginationQuery::default().normalize()
    }
}

impl PageRequest {
    /// Whether paging is disabled.
    pub fn is_unbounded(&self) -> bool {
        self.limit.is_none()
    }

    /// SQL `LIMIT` value, if any.
    pub fn sql_limit(&self) -> Option<i64> {
        self.limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX))
    }

    /// SQL `OFFSET` value.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }
}

/// Metadata returned alongside every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Filters that were supplied with the request.
    pub applied_filters: Vec<Filter>,
    /// Current page number (1-based).
    pub current_page: u64,
    /// Page size used for this response.
    pub items_per_page: u64,
    /// Number of pages, from the total when known, else from this page's rows.
    pub page_count: u64,
    /// Sort order that was supplied with the request.
    pub sort_order: Vec<OrderBy>,
    /// Index of the first returned item.
    pub start_index: u64,
    /// Total number of matching items, when `includeTotal` was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl PageMeta {
    /// Build metadata for a page of `returned` items.
    ///
    /// Without a total, the page count is derived from the returned rows alone.
    pub fn new(request: &PageRequest, returned: usize, total_count: Option<u64>) -> Self {
        let returned = returned as u64;
        let items_per_page = request.limit.unwrap_or(returned).max(1);
        let known = total_count.unwrap_or(returned);
        let page_count = if request.is_unbounded() {
            1
        } else {
            known.div_ceil(items_per_page).max(1)
        };

        Self {
            applied_filters: request.filters.clone(),
            current_page: request.page,
            items_per_page,
            page_count,
            sort_order: request.order.clone(),
            start_index: request.offset,
            total_count,
        }
    }
}

/// A page of items plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

impl<T> Paged<T> {
    /// Wrap `data` with metadata derived from the request.
    pub fn new(data: Vec<T>, request: &PageRequest, total_count: Option<u64>) -> Self {
        let meta = PageMeta::new(request, data.len(), total_count);
        Self { data, meta }
    }

    /// Replace the items while keeping the metadata.
    pub fn map_data<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> Paged<U> {
        Paged {
            data: f(self.data),
            meta: self.meta,
        }
    }
}
