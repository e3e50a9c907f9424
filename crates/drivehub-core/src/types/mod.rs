//! Core type definitions used across the DriveHub workspace.

pub mod filter;
pub mod id;
pub mod pagination;
pub mod sorting;

pub use filter::Filter;
pub use id::*;
pub use pagination::{ALL_ITEMS, PageMeta, PageRequest, Paged, PaginationQuery};
pub use sorting::{OrderBy, SortDirection};
