//! ORDER BY construction from client sort requests.

use sqlx::{Postgres, QueryBuilder};

use drivehub_core::types::OrderBy;

/// Whitelist of sortable API keys and the columns they map to.
pub type SortColumns = &'static [(&'static str, &'static str)];

/// Resolved `(column, descending)` pairs for an ORDER BY clause.
///
/// Unknown ids are skipped. When nothing recognizable was requested the
/// `default_key` is sorted ascending; if that key is not whitelisted either,
/// the result is empty and no ordering is applied.
pub fn resolve_order(
    order: &[OrderBy],
    columns: SortColumns,
    default_key: &str,
) -> Vec<(&'static str, bool)> {
    let lookup = |key: &str| columns.iter().find(|(k, _)| *k == key).map(|(_, c)| *c);

    let resolved: Vec<(&'static str, bool)> = order
        .iter()
        .filter_map(|o| lookup(&o.id).map(|column| (column, o.desc)))
        .collect();

    if !resolved.is_empty() {
        return resolved;
    }
    lookup(default_key).map(|c| vec![(c, false)]).unwrap_or_default()
}

/// Append ` ORDER BY ...` to the builder.
///
/// `tie_breaker` is appended ascending after the resolved columns, and only
/// when there is some ordering to break ties in.
pub fn push_order(
    qb: &mut QueryBuilder<'static, Postgres>,
    resolved: &[(&'static str, bool)],
    tie_breaker: Option<&'static str>,
) {
    if resolved.is_empty() {
        return;
    }
    qb.push(" ORDER BY ");
    for (i, (column, desc)) in resolved.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(*column).push(if *desc { " DESC" } else { " ASC" });
    }
    if let Some(tie) = tie_breaker
        && !resolved.iter().any(|(c, _)| *c == tie)
    {
        qb.push(", ").push(tie).push(" ASC");
    }
}
