//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/ready
///
/// 503 when either the database or the blob store is unreachable.
pub async fn readiness(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<ReadinessResponse>>) {
    let database_ok = state.db.health_check().await.unwrap_or(false);
    let storage_ok = state.storage.health_check().await;

    let status = if database_ok && storage_ok {
        StatusCode::OK
    } else {
        tracing::warn!(database_ok, storage_ok, "Readiness check failed");
        StatusCode::SERVICE_UNAVAILABLE
    };
    let label = |ok: bool| (if ok { "ok" } else { "unavailable" }).to_string();

    (
        status,
        Json(ApiResponse::ok(ReadinessResponse {
            status: label(database_ok && storage_ok),
            database: label(database_ok),
            storage: label(storage_ok),
        })),
    )
}
