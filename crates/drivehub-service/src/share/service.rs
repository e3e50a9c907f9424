//! Share CRUD service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::types::{ResourceId, ShareId};
use drivehub_database::{ResourceStore, ShareStore};
use drivehub_entity::activity::ActivityType;
use drivehub_entity::share::{NewShare, ResourceShare, ShareGrant};

use super::link::generate_token;
use crate::activity::ActivityRecorder;
use crate::context::RequestContext;

/// Manages share creation, listing, and revocation.
///
/// Only the owner of a resource can see or change its shares.
#[derive(Clone)]
pub struct ShareService {
    shares: Arc<dyn ShareStore>,
    resources: Arc<dyn ResourceStore>,
    activity: ActivityRecorder,
}

impl std::fmt::Debug for ShareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareService").finish()
    }
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        resources: Arc<dyn ResourceStore>,
        activity: ActivityRecorder,
    ) -> Self {
        Self {
            shares,
            resources,
            activity,
        }
    }

    /// Shares an active resource with a user or through a public link.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        resource_id: ResourceId,
        grant: ShareGrant,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<ResourceShare> {
        self.resources
            .find_active(ctx.user_id, resource_id)
            .await?
            .ok_or_else(|| AppError::resource_not_found(format!("Resource {resource_id} not found")))?;

        if expires_at.is_some_and(|at| at <= Utc::now()) {
            return Err(AppError::validation("Expiry must be in the future"));
        }

        let access_level = grant.access_level();
        let (granted_to, public_link_token) = match grant {
            ShareGrant::User { user_id, .. } => {
                if user_id == ctx.user_id {
                    return Err(AppError::validation("Cannot share a resource with yourself"));
                }
                (Some(user_id), None)
            }
            ShareGrant::Public { .. } => (None, Some(generate_token())),
        };

        let share = self
            .shares
            .insert(&NewShare {
                resource_id,
                created_by: ctx.user_id,
                granted_to,
                public_link_token,
                access_level,
                expires_at,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            resource_id = %resource_id,
            public = share.is_public,
            "Share created"
        );
        self.activity
            .record(
                ctx,
                Some(resource_id),
                ActivityType::Share,
                json!({
                    "shareId": share.id,
                    "grantedTo": share.granted_to,
                    "public": share.is_public,
                    "accessLevel": share.access_level,
                }),
            )
            .await;

        Ok(share)
    }

    /// Shares on a resource the caller owns.
    pub async fn list_shares(
        &self,
        ctx: &RequestContext,
        resource_id: ResourceId,
    ) -> AppResult<Vec<ResourceShare>> {
        self.resources
            .find_owned(ctx.user_id, resource_id)
            .await?
            .ok_or_else(|| AppError::resource_not_found(format!("Resource {resource_id} not found")))?;

        self.shares.list_for_resource(resource_id).await
    }

    /// Revokes a share on a resource the caller owns.
    pub async fn revoke_share(&self, ctx: &RequestContext, share_id: ShareId) -> AppResult<()> {
        let not_found = || AppError::not_found(format!("Share {share_id} not found"));

        let share = self.shares.find(share_id).await?.ok_or_else(not_found)?;
        self.resources
            .find_owned(ctx.user_id, share.resource_id)
            .await?
            .ok_or_else(not_found)?;

        if !self.shares.delete(share_id).await? {
            return Err(not_found());
        }

        info!(user_id = %ctx.user_id, share_id = %share_id, "Share revoked");
        self.activity
            .record(
                ctx,
                Some(share.resource_id),
                ActivityType::Unshare,
                json!({ "shareId": share_id }),
            )
            .await;

        Ok(())
    }
}
