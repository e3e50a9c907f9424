//! Storage usage reporting.

pub mod service;

pub use service::{StorageService, StorageUsage};
