//! Request and response DTOs.

pub mod request;
pub mod response;

pub use request::{CreateFolderRequest, CreateShareRequest, MoveRequest, RenameRequest};
pub use response::{ApiResponse, HealthResponse, PagedResponse, ReadinessResponse};
