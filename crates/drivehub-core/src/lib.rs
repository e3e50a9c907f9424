//! # drivehub-core
//!
//! Core crate for DriveHub. Contains configuration schemas, typed
//! identifiers, the pagination/filter/order request model, the blob
//! storage trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DriveHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
