//! Paginated SELECT/COUNT pairs built from a [`PageRequest`].

use sqlx::{Postgres, QueryBuilder};

use drivehub_core::result::AppResult;
use drivehub_core::types::PageRequest;

use super::filter::{FieldMap, Predicate, build_where, push_where};
use super::order::{SortColumns, push_order, resolve_order};

/// Static description of one listing endpoint.
#[derive(Debug, Clone, Copy)]
pub struct ListingSpec {
    /// `SELECT ... FROM ...` prefix, without WHERE.
    pub select: &'static str,
    /// `SELECT COUNT(*) FROM ...` prefix, without WHERE.
    pub count: &'static str,
    /// Filterable keys.
    pub fields: FieldMap,
    /// Sortable keys.
    pub sort_columns: SortColumns,
    /// Sort key used when the request names none that is known.
    pub default_sort: &'static str,
    /// Column appended to any ordering for stable pages.
    pub tie_breaker: Option<&'static str>,
}

/// Builders for a listing's data query and, when requested, its count query.
pub struct ListingQuery {
    /// The data query.
    pub select: QueryBuilder<'static, Postgres>,
    /// The count query; `None` unless the request asked for a total.
    pub count: Option<QueryBuilder<'static, Postgres>>,
}

impl ListingSpec {
    /// Build the queries for `request`, ANDing its filters with `base`.
    pub fn build(&self, request: &PageRequest, base: Vec<Predicate>) -> AppResult<ListingQuery> {
        let predicates = build_where(&request.filters, self.fields, base)?;

        let mut select = QueryBuilder::new(self.select);
        push_where(&mut select, &predicates);
        let resolved = resolve_order(&request.order, self.sort_columns, self.default_sort);
        push_order(&mut select, &resolved, self.tie_breaker);
        if let Some(limit) = request.sql_limit() {
            select.push(" LIMIT ").push_bind(limit);
        }
        if request.offset > 0 {
            select.push(" OFFSET ").push_bind(request.sql_offset());
        }

        let count = request.include_total.then(|| {
            let mut count = QueryBuilder::new(self.count);
            push_where(&mut count, &predicates);
            count
        });

        Ok(ListingQuery { select, count })
    }
}
