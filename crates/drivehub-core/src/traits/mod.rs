//! Core traits defined in `drivehub-core` and implemented by other crates.

pub mod storage;

pub use storage::{BlobStore, SignedUrl, UploadOptions};
