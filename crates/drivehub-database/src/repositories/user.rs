//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::types::UserId;
use drivehub_entity::user::{StorageQuota, User};

use super::UserStore;

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn quota(&self, owner: UserId) -> AppResult<StorageQuota> {
        let (quota, used) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT storage_quota, used_storage FROM users WHERE id = $1",
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read storage quota", e))?
        .ok_or_else(|| AppError::not_found(format!("User {owner} not found")))?;
        Ok(StorageQuota::new(quota, used))
    }

    async fn profile(&self, owner: UserId) -> AppResult<User> {
        self.find_by_id(owner)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {owner} not found")))
    }
}
