//! Persistence traits consumed by the service layer and their PostgreSQL
//! repositories.
//!
//! Services hold `Arc<dyn ...Store>` so that the resource engine can be
//! exercised against in-memory implementations in tests.

pub mod activity;
pub mod resource;
pub mod share;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use drivehub_core::result::AppResult;
use drivehub_core::types::{PageRequest, ResourceId, ShareId, UserId};
use drivehub_entity::activity::{ActivityLog, NewActivity};
use drivehub_entity::resource::{NewResource, Resource};
use drivehub_entity::share::{NewShare, ResourceShare};
use drivehub_entity::user::{StorageQuota, User};

pub use activity::ActivityLogRepository;
pub use resource::ResourceRepository;
pub use share::ShareRepository;
pub use user::UserRepository;

/// Rows removed by a purge, and the bytes released from the owner's quota.
#[derive(Debug, Clone, Default)]
pub struct PurgeOutcome {
    /// Every row of the purged subtree, root first.
    pub removed: Vec<Resource>,
    /// Sum of the removed files' sizes.
    pub freed_bytes: i64,
}

/// Resource (file and folder) persistence.
#[async_trait]
pub trait ResourceStore: Send + Sync + 'static {
    /// Any resource by id, regardless of owner and state.
    async fn find_by_id(&self, id: ResourceId) -> AppResult<Option<Resource>>;

    /// A resource owned by `owner`, in any state.
    async fn find_owned(&self, owner: UserId, id: ResourceId) -> AppResult<Option<Resource>>;

    /// An active resource owned by `owner`.
    async fn find_active(&self, owner: UserId, id: ResourceId) -> AppResult<Option<Resource>>;

    /// An active folder owned by `owner`.
    async fn find_owned_folder(&self, owner: UserId, id: ResourceId)
    -> AppResult<Option<Resource>>;

    /// Names of active siblings under `(owner, parent)` that start with `prefix`.
    async fn sibling_names_with_prefix(
        &self,
        owner: UserId,
        parent: Option<ResourceId>,
        prefix: &str,
    ) -> AppResult<Vec<String>>;

    /// An active sibling under `(owner, parent)` named `name`, or a file with content hash `hash`.
    async fn find_collision(
        &self,
        owner: UserId,
        parent: Option<ResourceId>,
        name: &str,
        hash: &str,
    ) -> AppResult<Option<Resource>>;

    /// Whether an active sibling other than `excluding` already uses `name`.
    async fn name_taken(
        &self,
        owner: UserId,
        parent: Option<ResourceId>,
        name: &str,
        excluding: Option<ResourceId>,
    ) -> AppResult<bool>;

    /// Insert a row. A sibling name conflict fails with `FileAlreadyExists`.
    async fn insert(&self, new: &NewResource) -> AppResult<Resource>;

    /// Insert a file row and add its size to the owner's usage in one transaction.
    ///
    /// Fails with `StorageQuotaExceeded` when the increment would overrun the
    /// quota; nothing is written in that case.
    async fn insert_file_charging_quota(&self, new: &NewResource) -> AppResult<Resource>;

    /// Rename an active resource.
    async fn rename(&self, owner: UserId, id: ResourceId, name: &str) -> AppResult<Resource>;

    /// Ids from `id` up to its root, `id` first.
    async fn ancestor_ids(&self, id: ResourceId) -> AppResult<Vec<ResourceId>>;

    /// The resource and all of its descendants in any state, root first.
    async fn subtree(&self, owner: UserId, id: ResourceId) -> AppResult<Vec<Resource>>;

    /// Re-parent `id` and rewrite the storage path prefix of its subtree.
    async fn relocate(
        &self,
        owner: UserId,
        id: ResourceId,
        new_parent: Option<ResourceId>,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<Resource>;

    /// Mark the resource and its active descendants deleted at `at`. Returns rows changed.
    async fn soft_delete_subtree(
        &self,
        owner: UserId,
        id: ResourceId,
        at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Reactivate the rows of the subtree deleted at `deleted_at`. Returns rows changed.
    async fn restore_subtree(
        &self,
        owner: UserId,
        id: ResourceId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Move an active resource to the archived state.
    async fn archive(&self, owner: UserId, id: ResourceId) -> AppResult<Resource>;

    /// Move an archived resource back to the active state.
    async fn unarchive(&self, owner: UserId, id: ResourceId) -> AppResult<Resource>;

    /// A page of the owner's resources plus the total when requested.
    async fn list(
        &self,
        owner: UserId,
        request: &PageRequest,
    ) -> AppResult<(Vec<Resource>, Option<u64>)>;

    /// Delete the subtree rows and release their bytes from the owner's usage.
    async fn purge_subtree(&self, owner: UserId, id: ResourceId) -> AppResult<PurgeOutcome>;
}

/// Quota bookkeeping on users.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Current quota and usage of `owner`. Fails with `NotFound` for unknown users.
    async fn quota(&self, owner: UserId) -> AppResult<StorageQuota>;

    /// The account row of `owner`. Fails with `NotFound` for unknown users.
    async fn profile(&self, owner: UserId) -> AppResult<User>;
}

/// Resource share persistence.
#[async_trait]
pub trait ShareStore: Send + Sync + 'static {
    /// Insert a share.
    async fn insert(&self, new: &NewShare) -> AppResult<ResourceShare>;

    /// Shares on a resource, oldest first.
    async fn list_for_resource(&self, resource_id: ResourceId) -> AppResult<Vec<ResourceShare>>;

    /// A share by id.
    async fn find(&self, id: ShareId) -> AppResult<Option<ResourceShare>>;

    /// Delete a share. Returns whether it existed.
    async fn delete(&self, id: ShareId) -> AppResult<bool>;

    /// An unexpired grant to `user` on any of `resource_ids`.
    async fn find_user_grant(
        &self,
        resource_ids: &[ResourceId],
        user: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ResourceShare>>;

    /// An unexpired public link with `token` on any of `resource_ids`.
    async fn find_token_grant(
        &self,
        resource_ids: &[ResourceId],
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ResourceShare>>;
}

/// Which activity rows a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityScope {
    /// Everything a user did.
    User(UserId),
    /// Everything that happened to a resource.
    Resource(ResourceId),
}

/// Activity log persistence.
#[async_trait]
pub trait ActivityStore: Send + Sync + 'static {
    /// Append an entry.
    async fn record(&self, entry: &NewActivity) -> AppResult<ActivityLog>;

    /// A page of entries in `scope` plus the total when requested.
    async fn list(
        &self,
        scope: ActivityScope,
        request: &PageRequest,
    ) -> AppResult<(Vec<ActivityLog>, Option<u64>)>;
}
