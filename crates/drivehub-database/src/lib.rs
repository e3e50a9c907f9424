//! # drivehub-database
//!
//! PostgreSQL connection management, the filter/order query builder used
//! by every paginated listing, the persistence traits the service layer
//! depends on, and their PostgreSQL implementations.

pub mod connection;
pub mod migration;
pub mod query;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{ActivityScope, ActivityStore, ResourceStore, ShareStore, UserStore};
