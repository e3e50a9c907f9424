//! In-memory stores and a fully wired set of services for unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use drivehub_core::config::{PaginationConfig, StorageConfig};
use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::storage::{BlobStore, SignedUrl, UploadOptions};
use drivehub_core::types::{ActivityLogId, PageRequest, ResourceId, ShareId, UserId};
use drivehub_database::repositories::PurgeOutcome;
use drivehub_database::{ActivityScope, ActivityStore, ResourceStore, ShareStore, UserStore};
use drivehub_entity::activity::{ActivityLog, ActivityType, NewActivity};
use drivehub_entity::resource::{NewResource, Resource, ResourceState};
use drivehub_entity::share::{NewShare, ResourceShare};
use drivehub_entity::user::{StorageQuota, User};
use drivehub_storage::{MemoryBlobStore, UrlSigner};

use crate::activity::{ActivityRecorder, ActivityService};
use crate::context::RequestContext;
use crate::file::{UploadParams, UploadService};
use crate::resource::ResourceService;
use crate::share::ShareService;
use crate::storage::StorageService;

fn page<T>(items: Vec<T>, request: &PageRequest) -> (Vec<T>, Option<u64>) {
    let total = request.include_total.then_some(items.len() as u64);
    let limit = request.limit.map_or(usize::MAX, |l| l as usize);
    let rows = items
        .into_iter()
        .skip(request.offset as usize)
        .take(limit)
        .collect();
    (rows, total)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<UserId, User>>,
}

impl MemoryUserStore {
    pub fn with_user(user: UserId, quota: i64, used: i64) -> Self {
        let now = Utc::now();
        let row = User {
            id: user,
            email: format!("{user}@drive.test"),
            storage_quota: quota,
            used_storage: used,
            created_at: now,
            updated_at: now,
        };
        Self {
            users: Mutex::new(HashMap::from([(user, row)])),
        }
    }

    pub async fn used(&self, user: UserId) -> i64 {
        self.users.lock().await.get(&user).map_or(0, |u| u.used_storage)
    }

    async fn charge(&self, user: UserId, bytes: i64) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let row = users
            .get_mut(&user)
            .ok_or_else(|| AppError::not_found(format!("User {user} not found")))?;
        if row.quota().would_exceed(bytes) {
            return Err(AppError::quota_exceeded("Storage quota exceeded"));
        }
        row.used_storage += bytes;
        Ok(())
    }

    async fn release(&self, user: UserId, bytes: i64) {
        if let Some(row) = self.users.lock().await.get_mut(&user) {
            row.used_storage = (row.used_storage - bytes).max(0);
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn quota(&self, owner: UserId) -> AppResult<StorageQuota> {
        Ok(self.profile(owner).await?.quota())
    }

    async fn profile(&self, owner: UserId) -> AppResult<User> {
        self.users
            .lock()
            .await
            .get(&owner)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("User {owner} not found")))
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MemoryResourceStore {
    rows: Mutex<Vec<Resource>>,
    users: Arc<MemoryUserStore>,
    fail_writes: AtomicBool,
    racing_inserts: AtomicUsize,
}

impl MemoryResourceStore {
    pub fn new(users: Arc<MemoryUserStore>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            users,
            fail_writes: AtomicBool::new(false),
            racing_inserts: AtomicUsize::new(0),
        }
    }

    /// Let a concurrent writer win the next `count` inserts: each one finds
    /// its name taken by a sibling created just before it.
    pub fn race_next_inserts(&self, count: usize) {
        self.racing_inserts.store(count, Ordering::SeqCst);
    }

    fn take_race(&self) -> bool {
        self.racing_inserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Make every subsequent write fail with a database error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn get(&self, id: ResourceId) -> Option<Resource> {
        self.rows.lock().await.iter().find(|r| r.id == id).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }

    fn check_writable(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("Simulated write failure"));
        }
        Ok(())
    }
}

fn active_siblings(
    rows: &[Resource],
    owner: UserId,
    parent: Option<ResourceId>,
) -> impl Iterator<Item = &Resource> {
    rows.iter()
        .filter(move |r| r.owner_id == owner && r.parent_id == parent && r.state.is_active())
}

fn name_conflict(
    rows: &[Resource],
    owner: UserId,
    parent: Option<ResourceId>,
    name: &str,
    excluding: Option<ResourceId>,
) -> bool {
    active_siblings(rows, owner, parent).any(|r| r.name == name && Some(r.id) != excluding)
}

fn subtree_ids(rows: &[Resource], owner: UserId, id: ResourceId) -> Vec<ResourceId> {
    if !rows.iter().any(|r| r.id == id && r.owner_id == owner) {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut queue = VecDeque::from([id]);
    while let Some(current) = queue.pop_front() {
        out.push(current);
        queue.extend(
            rows.iter()
                .filter(|r| r.parent_id == Some(current))
                .map(|r| r.id),
        );
    }
    out
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn find_by_id(&self, id: ResourceId) -> AppResult<Option<Resource>> {
        Ok(self.get(id).await)
    }

    async fn find_owned(&self, owner: UserId, id: ResourceId) -> AppResult<Option<Resource>> {
        Ok(self.get(id).await.filter(|r| r.owner_id == owner))
    }

    async fn find_active(&self, owner: UserId, id: ResourceId) -> AppResult<Option<Resource>> {
        Ok(self
            .find_owned(owner, id)
            .await?
            .filter(|r| r.state.is_active()))
    }

    async fn find_owned_folder(
        &self,
        owner: UserId,
        id: ResourceId,
    ) -> AppResult<Option<Resource>> {
        Ok(self.find_active(owner, id).await?.filter(|r| r.is_folder))
    }

    async fn sibling_names_with_prefix(
        &self,
        owner: UserId,
        parent: Option<ResourceId>,
        prefix: &str,
    ) -> AppResult<Vec<String>> {
        let rows = self.rows.lock().await;
        Ok(active_siblings(&rows, owner, parent)
            .filter(|r| r.name.starts_with(prefix))
            .map(|r| r.name.clone())
            .collect())
    }

    async fn find_collision(
        &self,
        owner: UserId,
        parent: Option<ResourceId>,
        name: &str,
        hash: &str,
    ) -> AppResult<Option<Resource>> {
        let rows = self.rows.lock().await;
        Ok(active_siblings(&rows, owner, parent)
            .find(|r| r.name == name || (!r.is_folder && r.content_hash.as_deref() == Some(hash)))
            .cloned())
    }

    async fn name_taken(
        &self,
        owner: UserId,
        parent: Option<ResourceId>,
        name: &str,
        excluding: Option<ResourceId>,
    ) -> AppResult<bool> {
        let rows = self.rows.lock().await;
        Ok(name_conflict(&rows, owner, parent, name, excluding))
    }

    async fn insert(&self, new: &NewResource) -> AppResult<Resource> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        if self.take_race() {
            let winner = NewResource {
                id: ResourceId::new(),
                storage_path: format!("{}-winner", new.storage_path),
                ..new.clone()
            };
            rows.push(winner.into_resource(Utc::now()));
        }
        if let Some(parent) = new.parent_id {
            if !rows.iter().any(|r| r.id == parent) {
                return Err(AppError::parent_not_found("Parent folder not found"));
            }
        }
        if name_conflict(&rows, new.owner_id, new.parent_id, &new.name, None) {
            return Err(AppError::file_already_exists(format!(
                "A resource named '{}' already exists",
                new.name
            )));
        }
        let resource = new.clone().into_resource(Utc::now());
        rows.push(resource.clone());
        Ok(resource)
    }

    async fn insert_file_charging_quota(&self, new: &NewResource) -> AppResult<Resource> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        if name_conflict(&rows, new.owner_id, new.parent_id, &new.name, None) {
            return Err(AppError::file_already_exists(format!(
                "A resource named '{}' already exists",
                new.name
            )));
        }
        self.users.charge(new.owner_id, new.size).await?;
        let resource = new.clone().into_resource(Utc::now());
        rows.push(resource.clone());
        Ok(resource)
    }

    async fn rename(&self, owner: UserId, id: ResourceId, name: &str) -> AppResult<Resource> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        let parent = rows
            .iter()
            .find(|r| r.id == id && r.owner_id == owner && r.state.is_active())
            .map(|r| r.parent_id)
            .ok_or_else(|| AppError::resource_not_found("Resource not found"))?;
        if name_conflict(&rows, owner, parent, name, Some(id)) {
            return Err(AppError::file_already_exists("Name taken"));
        }
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::resource_not_found("Resource not found"))?;
        row.name = name.to_string();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn ancestor_ids(&self, id: ResourceId) -> AppResult<Vec<ResourceId>> {
        let rows = self.rows.lock().await;
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(row) = rows.iter().find(|r| r.id == cid) else {
                break;
            };
            if chain.contains(&cid) {
                break;
            }
            chain.push(cid);
            current = row.parent_id;
        }
        Ok(chain)
    }

    async fn subtree(&self, owner: UserId, id: ResourceId) -> AppResult<Vec<Resource>> {
        let rows = self.rows.lock().await;
        Ok(subtree_ids(&rows, owner, id)
            .into_iter()
            .filter_map(|sid| rows.iter().find(|r| r.id == sid).cloned())
            .collect())
    }

    async fn relocate(
        &self,
        owner: UserId,
        id: ResourceId,
        new_parent: Option<ResourceId>,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<Resource> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        let nested = format!("{old_prefix}/");
        for row in rows.iter_mut().filter(|r| r.owner_id == owner) {
            if row.storage_path == old_prefix || row.storage_path.starts_with(&nested) {
                row.storage_path = format!("{new_prefix}{}", &row.storage_path[old_prefix.len()..]);
            }
        }
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner)
            .ok_or_else(|| AppError::resource_not_found("Resource not found"))?;
        row.parent_id = new_parent;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn soft_delete_subtree(
        &self,
        owner: UserId,
        id: ResourceId,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        let ids: HashSet<_> = subtree_ids(&rows, owner, id).into_iter().collect();
        let mut changed = 0;
        for row in rows.iter_mut().filter(|r| ids.contains(&r.id) && r.state.is_active()) {
            row.state = ResourceState::Deleted(at);
            changed += 1;
        }
        Ok(changed)
    }

    async fn restore_subtree(
        &self,
        owner: UserId,
        id: ResourceId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        let ids: HashSet<_> = subtree_ids(&rows, owner, id).into_iter().collect();
        let mut changed = 0;
        for row in rows
            .iter_mut()
            .filter(|r| ids.contains(&r.id) && r.state == ResourceState::Deleted(deleted_at))
        {
            row.state = ResourceState::Active;
            changed += 1;
        }
        Ok(changed)
    }

    async fn archive(&self, owner: UserId, id: ResourceId) -> AppResult<Resource> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner && r.state.is_active())
            .ok_or_else(|| AppError::resource_not_found("Resource not found"))?;
        row.state = ResourceState::Archived;
        Ok(row.clone())
    }

    async fn unarchive(&self, owner: UserId, id: ResourceId) -> AppResult<Resource> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner && r.state == ResourceState::Archived)
            .ok_or_else(|| AppError::resource_not_found("Resource not found"))?;
        row.state = ResourceState::Active;
        Ok(row.clone())
    }

    async fn list(
        &self,
        owner: UserId,
        request: &PageRequest,
    ) -> AppResult<(Vec<Resource>, Option<u64>)> {
        let rows = self.rows.lock().await;
        let owned: Vec<Resource> = rows
            .iter()
            .filter(|r| r.owner_id == owner && r.state.is_active())
            .cloned()
            .collect();
        Ok(page(owned, request))
    }

    async fn purge_subtree(&self, owner: UserId, id: ResourceId) -> AppResult<PurgeOutcome> {
        self.check_writable()?;
        let mut rows = self.rows.lock().await;
        let ids = subtree_ids(&rows, owner, id);
        let removed: Vec<Resource> = ids
            .iter()
            .filter_map(|sid| rows.iter().find(|r| r.id == *sid).cloned())
            .collect();
        let freed_bytes = removed.iter().filter(|r| r.is_file()).map(|r| r.size).sum();
        rows.retain(|r| !ids.contains(&r.id));
        drop(rows);
        self.users.release(owner, freed_bytes).await;
        Ok(PurgeOutcome {
            removed,
            freed_bytes,
        })
    }
}

// ---------------------------------------------------------------------------
// Shares
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryShareStore {
    shares: Mutex<Vec<ResourceShare>>,
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn insert(&self, new: &NewShare) -> AppResult<ResourceShare> {
        let mut shares = self.shares.lock().await;
        if new.granted_to.is_some()
            && shares
                .iter()
                .any(|s| s.resource_id == new.resource_id && s.granted_to == new.granted_to)
        {
            return Err(AppError::conflict("Already shared with this user"));
        }
        let share = ResourceShare {
            id: ShareId::new(),
            resource_id: new.resource_id,
            created_by: new.created_by,
            granted_to: new.granted_to,
            is_public: new.is_public(),
            public_link_token: new.public_link_token.clone(),
            access_level: new.access_level,
            expires_at: new.expires_at,
            created_at: Utc::now(),
        };
        shares.push(share.clone());
        Ok(share)
    }

    async fn list_for_resource(&self, resource_id: ResourceId) -> AppResult<Vec<ResourceShare>> {
        let shares = self.shares.lock().await;
        Ok(shares
            .iter()
            .filter(|s| s.resource_id == resource_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: ShareId) -> AppResult<Option<ResourceShare>> {
        Ok(self.shares.lock().await.iter().find(|s| s.id == id).cloned())
    }

    async fn delete(&self, id: ShareId) -> AppResult<bool> {
        let mut shares = self.shares.lock().await;
        let before = shares.len();
        shares.retain(|s| s.id != id);
        Ok(shares.len() != before)
    }

    async fn find_user_grant(
        &self,
        resource_ids: &[ResourceId],
        user: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ResourceShare>> {
        let shares = self.shares.lock().await;
        Ok(shares
            .iter()
            .find(|s| {
                resource_ids.contains(&s.resource_id)
                    && s.granted_to == Some(user)
                    && s.is_valid_at(now)
            })
            .cloned())
    }

    async fn find_token_grant(
        &self,
        resource_ids: &[ResourceId],
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ResourceShare>> {
        let shares = self.shares.lock().await;
        Ok(shares
            .iter()
            .find(|s| {
                resource_ids.contains(&s.resource_id)
                    && s.is_public
                    && s.public_link_token.as_deref() == Some(token)
                    && s.is_valid_at(now)
            })
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryActivityStore {
    entries: Mutex<Vec<ActivityLog>>,
}

impl MemoryActivityStore {
    pub async fn types(&self) -> Vec<ActivityType> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|e| e.activity_type)
            .collect()
    }
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn record(&self, entry: &NewActivity) -> AppResult<ActivityLog> {
        let log = ActivityLog {
            id: ActivityLogId::new(),
            user_id: entry.user_id,
            resource_id: entry.resource_id,
            activity_type: entry.activity_type,
            details: entry.details.clone(),
            ip_address: entry.ip_address.clone(),
            user_agent: entry.user_agent.clone(),
            created_at: Utc::now(),
        };
        self.entries.lock().await.push(log.clone());
        Ok(log)
    }

    async fn list(
        &self,
        scope: ActivityScope,
        request: &PageRequest,
    ) -> AppResult<(Vec<ActivityLog>, Option<u64>)> {
        let entries = self.entries.lock().await;
        let matching: Vec<ActivityLog> = entries
            .iter()
            .filter(|e| match scope {
                ActivityScope::User(user) => e.user_id == user,
                ActivityScope::Resource(resource) => e.resource_id == Some(resource),
            })
            .cloned()
            .collect();
        Ok(page(matching, request))
    }
}

// ---------------------------------------------------------------------------
// Blobs
// ---------------------------------------------------------------------------

/// Memory blob store with switchable failures.
#[derive(Debug)]
pub struct FailingBlobStore {
    inner: MemoryBlobStore,
    fail_uploads: AtomicBool,
    fail_move_number: AtomicUsize,
    moves: AtomicUsize,
    removals: AtomicUsize,
}

impl FailingBlobStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryBlobStore::new(UrlSigner::new("http://localhost:8080", "test-secret")),
            fail_uploads: AtomicBool::new(false),
            fail_move_number: AtomicUsize::new(usize::MAX),
            moves: AtomicUsize::new(0),
            removals: AtomicUsize::new(0),
        }
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Fail only the `n`-th move call from now on (1-based).
    pub fn fail_move_number(&self, n: usize) {
        self.moves.store(0, Ordering::SeqCst);
        self.fail_move_number.store(n, Ordering::SeqCst);
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.inner.exists(path).await.unwrap_or(false)
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.keys().await.is_empty()
    }

    /// Number of `remove` calls seen.
    pub async fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for FailingBlobStore {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn upload(&self, path: &str, data: Bytes, options: UploadOptions) -> AppResult<String> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::storage("Simulated upload failure"));
        }
        self.inner.upload(path, data, options).await
    }

    async fn read(&self, path: &str) -> AppResult<Bytes> {
        self.inner.read(path).await
    }

    async fn remove(&self, paths: &[String]) -> AppResult<()> {
        self.removals.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(paths).await
    }

    async fn move_object(&self, from: &str, to: &str) -> AppResult<()> {
        let number = self.moves.fetch_add(1, Ordering::SeqCst) + 1;
        if number == self.fail_move_number.load(Ordering::SeqCst) {
            return Err(AppError::storage("Simulated move failure"));
        }
        self.inner.move_object(from, to).await
    }

    async fn create_signed_url(&self, path: &str, expires_in: Duration) -> AppResult<SignedUrl> {
        self.inner.create_signed_url(path, expires_in).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// One registered owner, one unregistered stranger, and every service wired
/// to the in-memory stores.
pub struct Harness {
    pub owner: UserId,
    pub stranger: UserId,
    pub config: StorageConfig,
    pub resources: Arc<MemoryResourceStore>,
    pub users: Arc<MemoryUserStore>,
    pub activity: Arc<MemoryActivityStore>,
    pub blobs: Arc<FailingBlobStore>,
    pub resource_service: ResourceService,
    pub upload_service: UploadService,
    pub share_service: ShareService,
    pub activity_service: ActivityService,
    pub storage_service: StorageService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_quota(1 << 30, 0)
    }

    pub fn with_quota(quota: i64, used: i64) -> Self {
        let owner = UserId::new();
        let config = StorageConfig {
            max_upload_size_bytes: 4096,
            ..StorageConfig::default()
        };

        let users = Arc::new(MemoryUserStore::with_user(owner, quota, used));
        let resources = Arc::new(MemoryResourceStore::new(users.clone()));
        let shares = Arc::new(MemoryShareStore::default());
        let activity = Arc::new(MemoryActivityStore::default());
        let blobs = Arc::new(FailingBlobStore::new());
        let recorder = ActivityRecorder::new(activity.clone());

        let resource_service = ResourceService::new(
            resources.clone(),
            shares.clone(),
            blobs.clone(),
            recorder.clone(),
            PaginationConfig::default(),
            &config,
        );
        let upload_service = UploadService::new(
            resources.clone(),
            users.clone(),
            blobs.clone(),
            recorder.clone(),
            config.clone(),
        );
        let share_service = ShareService::new(shares, resources.clone(), recorder);
        let activity_service =
            ActivityService::new(activity.clone(), resources.clone(), PaginationConfig::default());
        let storage_service = StorageService::new(users.clone(), blobs.clone());

        Self {
            owner,
            stranger: UserId::new(),
            config,
            resources,
            users,
            activity,
            blobs,
            resource_service,
            upload_service,
            share_service,
            activity_service,
            storage_service,
        }
    }

    pub fn ctx(&self) -> RequestContext {
        RequestContext::new(self.owner)
    }

    pub fn stranger_ctx(&self) -> RequestContext {
        RequestContext::new(self.stranger)
    }

    pub async fn folder(&self, name: &str, parent: Option<ResourceId>) -> Resource {
        self.resource_service
            .create_folder(&self.ctx(), name, parent)
            .await
            .expect("create folder")
    }

    pub async fn file(&self, name: &str, parent: Option<ResourceId>, data: &[u8]) -> Resource {
        self.upload_service
            .upload(
                &self.ctx(),
                UploadParams {
                    parent_id: parent,
                    name: name.to_string(),
                    mime_type: Some("application/octet-stream".to_string()),
                    data: Bytes::copy_from_slice(data),
                },
            )
            .await
            .expect("upload file")
    }
}
