//! # drivehub-storage
//!
//! Blob store backends for DriveHub: local filesystem, in-memory, and
//! S3-compatible object storage behind the `s3` feature.

pub mod manager;
pub mod providers;
pub mod signing;

pub use manager::StorageManager;
pub use providers::{LocalBlobStore, MemoryBlobStore};
pub use signing::UrlSigner;
