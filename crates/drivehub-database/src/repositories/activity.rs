//! Activity log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::types::{ActivityLogId, PageRequest};
use drivehub_entity::activity::{ActivityLog, NewActivity};

use super::{ActivityScope, ActivityStore};
use crate::query::{FieldSpec, ListingQuery, ListingSpec, Operator, Predicate, transform};

/// Listing over `activity_logs`; scoped per call by user or resource.
pub const ACTIVITY_LISTING: ListingSpec = ListingSpec {
    select: "SELECT * FROM activity_logs",
    count: "SELECT COUNT(*) FROM activity_logs",
    fields: &[
        (
            "activityType",
            FieldSpec::new("activity_type::text", Operator::Eq, transform::lowercase),
        ),
        // Older clients filter by `actionType`.
        (
            "actionType",
            FieldSpec::new("activity_type::text", Operator::Eq, transform::lowercase),
        ),
        ("createdAt", FieldSpec::new("created_at", Operator::SameDay, transform::day_start)),
    ],
    sort_columns: &[("createdAt", "created_at"), ("activityType", "activity_type")],
    default_sort: "createdAt",
    tie_breaker: Some("id"),
};

/// PostgreSQL-backed [`ActivityStore`].
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    /// Create a new activity log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn scope_predicate(scope: ActivityScope) -> Predicate {
    match scope {
        ActivityScope::User(user) => Predicate::eq("user_id", user.into_uuid()),
        ActivityScope::Resource(resource) => Predicate::eq("resource_id", resource.into_uuid()),
    }
}

#[async_trait]
impl ActivityStore for ActivityLogRepository {
    async fn record(&self, entry: &NewActivity) -> AppResult<ActivityLog> {
        sqlx::query_as::<_, ActivityLog>(
            "INSERT INTO activity_logs \
             (id, user_id, resource_id, activity_type, details, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(ActivityLogId::new())
        .bind(entry.user_id)
        .bind(entry.resource_id)
        .bind(entry.activity_type)
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record activity", e))
    }

    async fn list(
        &self,
        scope: ActivityScope,
        request: &PageRequest,
    ) -> AppResult<(Vec<ActivityLog>, Option<u64>)> {
        let ListingQuery { mut select, count } =
            ACTIVITY_LISTING.build(request, vec![scope_predicate(scope)])?;

        let rows = select
            .build_query_as::<ActivityLog>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list activity", e))?;

        let total = match count {
            Some(mut count) => {
                let total: i64 = count
                    .build_query_scalar()
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to count activity", e)
                    })?;
                Some(total.max(0) as u64)
            }
            None => None,
        };

        Ok((rows, total))
    }
}
