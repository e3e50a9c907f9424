//! Maps domain `AppError` to HTTP responses.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use drivehub_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound | ErrorKind::ParentNotFound | ErrorKind::ResourceNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorKind::Conflict | ErrorKind::FileAlreadyExists => StatusCode::CONFLICT,
        ErrorKind::StorageQuotaExceeded => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::UploadFailed
        | ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `AppError` as an HTTP response.
///
/// Handlers and extractors return this so that `?` on an `AppResult`
/// produces the JSON error body.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    details: Option<serde_json::Value>,
}

/// Result type of handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// The wrapped error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind
    }

    /// Validation failure listing the messages of each rejected field.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {field}"))
                })
                .collect();
            details.insert(field.to_string(), messages);
        }

        Self {
            error: AppError::validation("Validation failed"),
            details: serde_json::to_value(details).ok(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self { error, details } = self;
        let status = status_for(error.kind);

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(kind = %error.kind, error = ?error, "Internal server error");
            match error.kind {
                ErrorKind::UploadFailed => error.message.clone(),
                _ => "An internal error occurred".to_string(),
            }
        } else {
            error.message.clone()
        };

        let body = ApiErrorResponse {
            error: error.kind.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}
