//! # drivehub-service
//!
//! Business logic for DriveHub. Each service orchestrates the persistence
//! traits from `drivehub-database` and a [`BlobStore`] to implement one
//! group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.
//!
//! [`BlobStore`]: drivehub_core::traits::BlobStore

pub mod activity;
pub mod context;
pub mod file;
pub mod resource;
pub mod share;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use activity::{ActivityRecorder, ActivityService};
pub use context::RequestContext;
pub use file::{UploadParams, UploadService};
pub use resource::ResourceService;
pub use share::ShareService;
pub use storage::{StorageService, StorageUsage};
