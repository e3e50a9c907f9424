//! Activity log domain entities.

pub mod model;

pub use model::{ActivityLog, ActivityType, NewActivity};
