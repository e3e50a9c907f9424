//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use drivehub_auth::JwtDecoder;
use drivehub_core::config::AppConfig;
use drivehub_database::DatabasePool;
use drivehub_database::repositories::{
    ActivityLogRepository, ResourceRepository, ShareRepository, UserRepository,
};
use drivehub_database::{ActivityStore, ResourceStore, ShareStore, UserStore};
use drivehub_service::{
    ActivityRecorder, ActivityService, ResourceService, ShareService, StorageService,
    UploadService,
};
use drivehub_storage::StorageManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db: DatabasePool,
    /// Blob store and link signer
    pub storage: Arc<StorageManager>,
    /// When this state was built
    pub started_at: Instant,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token verifier
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Folder, listing, move, delete and download operations
    pub resource_service: Arc<ResourceService>,
    /// File uploads
    pub upload_service: Arc<UploadService>,
    /// Share management
    pub share_service: Arc<ShareService>,
    /// Activity listings
    pub activity_service: Arc<ActivityService>,
    /// Quota and usage
    pub storage_service: Arc<StorageService>,
}

impl AppState {
    /// Wire the PostgreSQL repositories and the blob store into the services.
    pub fn new(config: AppConfig, db: DatabasePool, storage: StorageManager) -> Self {
        let pool = db.pool().clone();
        let resources: Arc<dyn ResourceStore> = Arc::new(ResourceRepository::new(pool.clone()));
        let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(pool.clone()));
        let shares: Arc<dyn ShareStore> = Arc::new(ShareRepository::new(pool.clone()));
        let activity_log: Arc<dyn ActivityStore> = Arc::new(ActivityLogRepository::new(pool));

        let blobs = storage.store();
        let recorder = ActivityRecorder::new(Arc::clone(&activity_log));

        let resource_service = Arc::new(ResourceService::new(
            Arc::clone(&resources),
            Arc::clone(&shares),
            Arc::clone(&blobs),
            recorder.clone(),
            config.pagination.clone(),
            &config.storage,
        ));
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&resources),
            Arc::clone(&users),
            Arc::clone(&blobs),
            recorder.clone(),
            config.storage.clone(),
        ));
        let share_service = Arc::new(ShareService::new(
            shares,
            Arc::clone(&resources),
            recorder,
        ));
        let activity_service = Arc::new(ActivityService::new(
            activity_log,
            resources,
            config.pagination.clone(),
        ));
        let storage_service = Arc::new(StorageService::new(users, blobs));

        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        Self {
            config: Arc::new(config),
            db,
            storage: Arc::new(storage),
            started_at: Instant::now(),
            jwt_decoder,
            resource_service,
            upload_service,
            share_service,
            activity_service,
            storage_service,
        }
    }
}
