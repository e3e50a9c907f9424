//! Best-effort activity recording.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use drivehub_core::types::ResourceId;
use drivehub_database::ActivityStore;
use drivehub_entity::activity::{ActivityType, NewActivity};

use crate::context::RequestContext;

/// Appends activity entries on behalf of the other services.
///
/// A failed write is logged and swallowed; it never fails the operation
/// being recorded.
#[derive(Clone)]
pub struct ActivityRecorder {
    store: Arc<dyn ActivityStore>,
}

impl std::fmt::Debug for ActivityRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityRecorder").finish()
    }
}

impl ActivityRecorder {
    /// Creates a recorder writing to `store`.
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// Records `activity_type` for the caller in `ctx`.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        resource_id: Option<ResourceId>,
        activity_type: ActivityType,
        details: Value,
    ) {
        let entry = NewActivity {
            user_id: ctx.user_id,
            resource_id,
            activity_type,
            details,
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
        };

        if let Err(e) = self.store.record(&entry).await {
            warn!(
                user_id = %ctx.user_id,
                activity = activity_type.as_str(),
                error = %e,
                "Failed to record activity"
            );
        }
    }
}
