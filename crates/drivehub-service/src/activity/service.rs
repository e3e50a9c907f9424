//! Activity log listings.

use std::sync::Arc;

use drivehub_core::config::PaginationConfig;
use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::types::{PaginationQuery, Paged, ResourceId};
use drivehub_database::{ActivityScope, ActivityStore, ResourceStore};
use drivehub_entity::activity::ActivityLog;

use crate::context::RequestContext;

/// Lists what a user did, or what happened to one of their resources.
#[derive(Clone)]
pub struct ActivityService {
    activity: Arc<dyn ActivityStore>,
    resources: Arc<dyn ResourceStore>,
    pagination: PaginationConfig,
}

impl std::fmt::Debug for ActivityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityService")
            .field("pagination", &self.pagination)
            .finish()
    }
}

impl ActivityService {
    /// Creates a new activity service.
    pub fn new(
        activity: Arc<dyn ActivityStore>,
        resources: Arc<dyn ResourceStore>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            activity,
            resources,
            pagination,
        }
    }

    /// The caller's own activity, oldest first unless ordered otherwise.
    pub async fn list_own(
        &self,
        ctx: &RequestContext,
        query: PaginationQuery,
    ) -> AppResult<Paged<ActivityLog>> {
        let request = query.normalize_with(&self.pagination);
        let (rows, total) = self
            .activity
            .list(ActivityScope::User(ctx.user_id), &request)
            .await?;
        Ok(Paged::new(rows, &request, total))
    }

    /// Activity on a resource the caller owns, in any state.
    pub async fn list_for_resource(
        &self,
        ctx: &RequestContext,
        resource_id: ResourceId,
        query: PaginationQuery,
    ) -> AppResult<Paged<ActivityLog>> {
        self.resources
            .find_owned(ctx.user_id, resource_id)
            .await?
            .ok_or_else(|| AppError::resource_not_found(format!("Resource {resource_id} not found")))?;

        let request = query.normalize_with(&self.pagination);
        let (rows, total) = self
            .activity
            .list(ActivityScope::Resource(resource_id), &request)
            .await?;
        Ok(Paged::new(rows, &request, total))
    }
}
