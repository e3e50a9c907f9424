//! # drivehub-api
//!
//! HTTP API layer for DriveHub built on Axum.
//!
//! Exposes the resource, share, activity and storage services as JSON
//! endpoints, serves signed blob links, and maps `AppError` to HTTP
//! status codes.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
