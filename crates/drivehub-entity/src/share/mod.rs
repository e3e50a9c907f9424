//! Share domain entities.

pub mod model;

pub use model::{AccessLevel, NewShare, ResourceShare, ShareGrant};
