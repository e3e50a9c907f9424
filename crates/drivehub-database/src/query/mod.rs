//! Dynamic query construction for paginated listings.

pub mod filter;
pub mod listing;
pub mod order;

pub use filter::{
    FieldMap, FieldSpec, Operator, Predicate, SqlValue, Transform, build_where, escape_like,
    push_where, transform,
};
pub use listing::{ListingQuery, ListingSpec};
pub use order::{SortColumns, push_order, resolve_order};
