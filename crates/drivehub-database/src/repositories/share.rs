//! Resource share repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::types::{ResourceId, ShareId, UserId};
use drivehub_entity::share::{NewShare, ResourceShare};

use super::ShareStore;

/// PostgreSQL-backed [`ShareStore`].
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn insert(&self, new: &NewShare) -> AppResult<ResourceShare> {
        sqlx::query_as::<_, ResourceShare>(
            "INSERT INTO resource_shares \
             (id, resource_id, created_by, granted_to, is_public, public_link_token, \
              access_level, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(ShareId::new())
        .bind(new.resource_id)
        .bind(new.created_by)
        .bind(new.granted_to)
        .bind(new.is_public())
        .bind(&new.public_link_token)
        .bind(new.access_level)
        .bind(new.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("resource_shares_grantee_key") =>
            {
                AppError::conflict("The resource is already shared with this user")
            }
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("resource_shares_granted_to_fkey") =>
            {
                AppError::not_found("The user to share with does not exist")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create share", e),
        })
    }

    async fn list_for_resource(&self, resource_id: ResourceId) -> AppResult<Vec<ResourceShare>> {
        sqlx::query_as::<_, ResourceShare>(
            "SELECT * FROM resource_shares WHERE resource_id = $1 ORDER BY created_at ASC",
        )
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shares", e))
    }

    async fn find(&self, id: ShareId) -> AppResult<Option<ResourceShare>> {
        sqlx::query_as::<_, ResourceShare>("SELECT * FROM resource_shares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    async fn delete(&self, id: ShareId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM resource_shares WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete share", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_user_grant(
        &self,
        resource_ids: &[ResourceId],
        user: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ResourceShare>> {
        sqlx::query_as::<_, ResourceShare>(
            "SELECT * FROM resource_shares \
             WHERE resource_id = ANY($1) AND granted_to = $2 \
               AND (expires_at IS NULL OR expires_at > $3) \
             ORDER BY created_at ASC LIMIT 1",
        )
        .bind(resource_ids)
        .bind(user)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up share", e))
    }

    async fn find_token_grant(
        &self,
        resource_ids: &[ResourceId],
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ResourceShare>> {
        sqlx::query_as::<_, ResourceShare>(
            "SELECT * FROM resource_shares \
             WHERE resource_id = ANY($1) AND is_public AND public_link_token = $2 \
               AND (expires_at IS NULL OR expires_at > $3) \
             ORDER BY created_at ASC LIMIT 1",
        )
        .bind(resource_ids)
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up share link", e))
    }
}
