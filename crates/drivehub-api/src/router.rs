//! Route definitions for the DriveHub HTTP API.
//!
//! JSON routes are mounted under `/api`; signed blob links are served
//! from `/blobs`. The router receives `AppState` and passes it to all
//! handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(resource_routes())
        .merge(share_routes())
        .merge(activity_routes())
        .merge(storage_routes())
        .merge(user_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .route("/blobs/{*path}", get(handlers::blob::serve_blob))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness and readiness
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::readiness))
}

/// Files and folders
fn resource_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/resources",
            get(handlers::resource::list_resources).post(handlers::resource::create_folder),
        )
        .route("/resources/upload", post(handlers::resource::upload_file))
        .route(
            "/resources/{id}",
            get(handlers::resource::get_resource).delete(handlers::resource::delete_resource),
        )
        .route(
            "/resources/{id}/rename",
            patch(handlers::resource::rename_resource),
        )
        .route("/resources/{id}/move", patch(handlers::resource::move_resource))
        .route(
            "/resources/{id}/restore",
            post(handlers::resource::restore_resource),
        )
        .route(
            "/resources/{id}/archive",
            post(handlers::resource::archive_resource),
        )
        .route(
            "/resources/{id}/purge",
            delete(handlers::resource::purge_resource),
        )
        .route(
            "/resources/{id}/download",
            get(handlers::resource::download_url),
        )
}

/// Share grants and public links
fn share_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/resources/{id}/shares",
            get(handlers::share::list_shares).post(handlers::share::create_share),
        )
        .route("/shares/{id}", delete(handlers::share::revoke_share))
        .route(
            "/shared/{token}/{id}/download",
            get(handlers::share::shared_download_url),
        )
}

/// Activity log
fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/activity", get(handlers::activity::list_activity))
        .route(
            "/resources/{id}/activity",
            get(handlers::activity::list_resource_activity),
        )
}

/// Quota and usage
fn storage_routes() -> Router<AppState> {
    Router::new().route("/storage/usage", get(handlers::storage::usage))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(handlers::user::me))
}
