//! File intake.

pub mod upload;

pub use upload::{UploadParams, UploadService};
