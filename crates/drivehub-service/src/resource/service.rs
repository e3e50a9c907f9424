//! Resource lifecycle: folders, listings, rename, move, soft delete,
//! restore, archive, purge and download links.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use drivehub_core::config::{PaginationConfig, StorageConfig};
use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::traits::storage::{BlobStore, SignedUrl, UploadOptions};
use drivehub_core::types::{PageMeta, Paged, PaginationQuery, ResourceId, UserId};
use drivehub_database::{ResourceStore, ShareStore};
use drivehub_entity::activity::ActivityType;
use drivehub_entity::resource::{
    NewResource, Resource, ResourceNode, ResourceState, folder_placeholder_path,
};

use super::identity::{IdAndPath, child_storage_path, generate_id_and_path, root_storage_path};
use super::naming::{get_unique_name, validate_name};
use super::tree::build_tree;
use crate::activity::ActivityRecorder;
use crate::context::RequestContext;

/// Blob key backing a resource: the object itself for files, the
/// placeholder for folders.
pub fn blob_key(resource: &Resource) -> String {
    if resource.is_folder {
        resource.placeholder_path()
    } else {
        resource.storage_path.clone()
    }
}

/// What a purge removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeSummary {
    /// Rows removed, the purged resource included.
    pub removed: usize,
    /// Bytes released from the owner's quota.
    pub freed_bytes: i64,
}

/// Owner-scoped operations on files and folders.
#[derive(Clone)]
pub struct ResourceService {
    resources: Arc<dyn ResourceStore>,
    shares: Arc<dyn ShareStore>,
    blobs: Arc<dyn BlobStore>,
    activity: ActivityRecorder,
    pagination: PaginationConfig,
    signed_url_ttl: Duration,
}

impl std::fmt::Debug for ResourceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService")
            .field("blobs", &self.blobs)
            .field("signed_url_ttl", &self.signed_url_ttl)
            .finish_non_exhaustive()
    }
}

impl ResourceService {
    /// Creates a new resource service.
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        shares: Arc<dyn ShareStore>,
        blobs: Arc<dyn BlobStore>,
        activity: ActivityRecorder,
        pagination: PaginationConfig,
        storage: &StorageConfig,
    ) -> Self {
        Self {
            resources,
            shares,
            blobs,
            activity,
            pagination,
            signed_url_ttl: Duration::from_secs(storage.signed_url_expiry_seconds),
        }
    }

    /// Creates a folder, picking a free sibling name when `name` is taken.
    ///
    /// A placeholder object is written under the folder's storage path
    /// first and removed again if the row cannot be inserted.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<ResourceId>,
    ) -> AppResult<Resource> {
        let desired = validate_name(name)?;
        let owner = ctx.user_id;
        let IdAndPath { id, storage_path } =
            generate_id_and_path(self.resources.as_ref(), owner, parent_id).await?;

        let placeholder = folder_placeholder_path(&storage_path);
        self.blobs
            .upload(&placeholder, Bytes::new(), UploadOptions::upsert(None))
            .await
            .map_err(|e| AppError::wrap(ErrorKind::Storage, "Failed to create folder", e))?;

        let folder = match self
            .insert_folder(owner, id, parent_id, &desired, &storage_path)
            .await
        {
            Ok(folder) => folder,
            Err(e) => {
                self.discard_blobs(&[placeholder]).await;
                return Err(e);
            }
        };

        info!(
            user_id = %owner,
            resource_id = %folder.id,
            name = %folder.name,
            "Folder created"
        );
        self.activity
            .record(
                ctx,
                Some(folder.id),
                ActivityType::Create,
                json!({ "name": folder.name, "parentId": parent_id }),
            )
            .await;

        Ok(folder)
    }

    async fn insert_folder(
        &self,
        owner: UserId,
        id: ResourceId,
        parent_id: Option<ResourceId>,
        desired: &str,
        storage_path: &str,
    ) -> AppResult<Resource> {
        let mut name = get_unique_name(self.resources.as_ref(), owner, parent_id, desired).await?;
        let mut retried = false;

        loop {
            let new = NewResource {
                id,
                owner_id: owner,
                parent_id,
                name: name.clone(),
                is_folder: true,
                storage_path: storage_path.to_string(),
                mime_type: None,
                size: 0,
                content_hash: None,
            };

            match self.resources.insert(&new).await {
                Ok(folder) => return Ok(folder),
                Err(e) if e.is(ErrorKind::FileAlreadyExists) && !retried => {
                    warn!(user_id = %owner, name = %name, "Folder name taken concurrently, retrying");
                    retried = true;
                    name = get_unique_name(self.resources.as_ref(), owner, parent_id, desired)
                        .await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// An active resource owned by the caller.
    pub async fn get_resource(&self, ctx: &RequestContext, id: ResourceId) -> AppResult<Resource> {
        self.require_active(ctx.user_id, id).await
    }

    /// A page of the caller's resources, nested into a tree.
    ///
    /// Paging applies to rows; a child whose parent is on another page
    /// appears at the top level of this one.
    pub async fn list_resources(
        &self,
        ctx: &RequestContext,
        query: PaginationQuery,
    ) -> AppResult<Paged<ResourceNode>> {
        let request = query.normalize_with(&self.pagination);
        let (rows, total) = self.resources.list(ctx.user_id, &request).await?;
        let meta = PageMeta::new(&request, rows.len(), total);
        Ok(Paged {
            data: build_tree(rows),
            meta,
        })
    }

    /// Renames an active resource. A taken name is rejected, not de-duplicated.
    pub async fn rename_resource(
        &self,
        ctx: &RequestContext,
        id: ResourceId,
        new_name: &str,
    ) -> AppResult<Resource> {
        let name = validate_name(new_name)?;
        let owner = ctx.user_id;
        let resource = self.require_active(owner, id).await?;
        if resource.name == name {
            return Ok(resource);
        }

        if self
            .resources
            .name_taken(owner, resource.parent_id, &name, Some(id))
            .await?
        {
            return Err(AppError::file_already_exists(format!(
                "A resource named '{name}' already exists in this folder"
            )));
        }

        let renamed = self.resources.rename(owner, id, &name).await?;

        info!(user_id = %owner, resource_id = %id, from = %resource.name, to = %name, "Resource renamed");
        self.activity
            .record(
                ctx,
                Some(id),
                ActivityType::Rename,
                json!({ "from": resource.name, "to": renamed.name }),
            )
            .await;

        Ok(renamed)
    }

    /// Moves an active resource under `new_parent`, or to the top level.
    ///
    /// Stored objects are moved first; if the database update then fails
    /// they are moved back.
    pub async fn move_resource(
        &self,
        ctx: &RequestContext,
        id: ResourceId,
        new_parent: Option<ResourceId>,
    ) -> AppResult<Resource> {
        let owner = ctx.user_id;
        let resource = self.require_active(owner, id).await?;
        if resource.parent_id == new_parent {
            return Ok(resource);
        }

        let new_prefix = match new_parent {
            None => root_storage_path(owner, id),
            Some(parent_id) => {
                let parent = self
                    .resources
                    .find_owned_folder(owner, parent_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::parent_not_found(format!("Parent folder {parent_id} not found"))
                    })?;
                if resource.is_folder {
                    let chain = self.resources.ancestor_ids(parent_id).await?;
                    if chain.contains(&id) {
                        return Err(AppError::validation(
                            "A folder cannot be moved into itself or one of its subfolders",
                        ));
                    }
                }
                child_storage_path(&parent.storage_path, id)
            }
        };

        if self
            .resources
            .name_taken(owner, new_parent, &resource.name, Some(id))
            .await?
        {
            return Err(AppError::file_already_exists(format!(
                "A resource named '{}' already exists in the destination",
                resource.name
            )));
        }

        let old_prefix = resource.storage_path.clone();
        let subtree = self.resources.subtree(owner, id).await?;
        let mut moved: Vec<(String, String)> = Vec::with_capacity(subtree.len());

        for item in &subtree {
            let from = blob_key(item);
            let Some(rest) = from.strip_prefix(old_prefix.as_str()) else {
                continue;
            };
            let to = format!("{new_prefix}{rest}");
            match self.blobs.move_object(&from, &to).await {
                Ok(()) => moved.push((from, to)),
                Err(e) if e.is(ErrorKind::NotFound) => {
                    warn!(resource_id = %item.id, path = %from, "Stored object missing during move");
                }
                Err(e) => {
                    self.undo_moves(&moved).await;
                    return Err(AppError::wrap(
                        ErrorKind::Storage,
                        "Failed to move stored objects",
                        e,
                    ));
                }
            }
        }

        let relocated = match self
            .resources
            .relocate(owner, id, new_parent, &old_prefix, &new_prefix)
            .await
        {
            Ok(relocated) => relocated,
            Err(e) => {
                self.undo_moves(&moved).await;
                return Err(e);
            }
        };

        info!(
            user_id = %owner,
            resource_id = %id,
            objects = moved.len(),
            "Resource moved"
        );
        self.activity
            .record(
                ctx,
                Some(id),
                ActivityType::Move,
                json!({ "fromParentId": resource.parent_id, "toParentId": new_parent }),
            )
            .await;

        Ok(relocated)
    }

    /// Soft-deletes an active resource and its active descendants.
    pub async fn delete_resource(&self, ctx: &RequestContext, id: ResourceId) -> AppResult<Resource> {
        let owner = ctx.user_id;
        self.require_active(owner, id).await?;

        let affected = self
            .resources
            .soft_delete_subtree(owner, id, Utc::now())
            .await?;

        info!(user_id = %owner, resource_id = %id, affected, "Resource deleted");
        self.activity
            .record(ctx, Some(id), ActivityType::Delete, json!({ "affected": affected }))
            .await;

        self.require_owned(owner, id).await
    }

    /// Makes a deleted or archived resource active again.
    ///
    /// A deleted resource comes back together with everything deleted with
    /// it; an archived one comes back alone. The parent must be active.
    pub async fn restore_resource(
        &self,
        ctx: &RequestContext,
        id: ResourceId,
    ) -> AppResult<Resource> {
        let owner = ctx.user_id;
        let resource = self.require_owned(owner, id).await?;
        if resource.state.is_active() {
            return Err(AppError::resource_not_found(format!(
                "Resource {id} is neither deleted nor archived"
            )));
        }

        if let Some(parent_id) = resource.parent_id {
            self.resources
                .find_owned_folder(owner, parent_id)
                .await?
                .ok_or_else(|| {
                    AppError::parent_not_found(format!(
                        "Parent folder {parent_id} must be restored first"
                    ))
                })?;
        }

        if self
            .resources
            .name_taken(owner, resource.parent_id, &resource.name, Some(id))
            .await?
        {
            return Err(AppError::file_already_exists(format!(
                "A resource named '{}' already exists in this folder",
                resource.name
            )));
        }

        let affected = match resource.state {
            ResourceState::Deleted(deleted_at) => {
                self.resources.restore_subtree(owner, id, deleted_at).await?
            }
            _ => {
                self.resources.unarchive(owner, id).await?;
                1
            }
        };

        info!(user_id = %owner, resource_id = %id, affected, "Resource restored");
        self.activity
            .record(ctx, Some(id), ActivityType::Restore, json!({ "affected": affected }))
            .await;

        self.require_owned(owner, id).await
    }

    /// Archives an active resource.
    pub async fn archive_resource(
        &self,
        ctx: &RequestContext,
        id: ResourceId,
    ) -> AppResult<Resource> {
        let owner = ctx.user_id;
        self.require_active(owner, id).await?;
        let archived = self.resources.archive(owner, id).await?;

        info!(user_id = %owner, resource_id = %id, "Resource archived");
        self.activity
            .record(ctx, Some(id), ActivityType::Archive, json!({}))
            .await;

        Ok(archived)
    }

    /// Permanently removes a deleted resource, its subtree and stored objects.
    pub async fn purge_resource(
        &self,
        ctx: &RequestContext,
        id: ResourceId,
    ) -> AppResult<PurgeSummary> {
        let owner = ctx.user_id;
        let resource = self.require_owned(owner, id).await?;
        if !resource.state.is_deleted() {
            return Err(AppError::resource_not_found(format!(
                "Resource {id} must be deleted before it can be purged"
            )));
        }

        let outcome = self.resources.purge_subtree(owner, id).await?;
        let keys: Vec<String> = outcome.removed.iter().map(blob_key).collect();
        self.discard_blobs(&keys).await;

        let summary = PurgeSummary {
            removed: outcome.removed.len(),
            freed_bytes: outcome.freed_bytes,
        };

        info!(
            user_id = %owner,
            resource_id = %id,
            removed = summary.removed,
            freed_bytes = summary.freed_bytes,
            "Resource purged"
        );
        self.activity
            .record(
                ctx,
                None,
                ActivityType::Purge,
                json!({
                    "resourceId": id,
                    "name": resource.name,
                    "removed": summary.removed,
                    "freedBytes": summary.freed_bytes,
                }),
            )
            .await;

        Ok(summary)
    }

    /// A signed download link for a file the caller owns or was granted.
    ///
    /// A grant on the file or on any folder above it counts.
    pub async fn download_url(&self, ctx: &RequestContext, id: ResourceId) -> AppResult<SignedUrl> {
        let file = self.downloadable(id).await?;

        if file.owner_id != ctx.user_id {
            let chain = self.resources.ancestor_ids(id).await?;
            self.shares
                .find_user_grant(&chain, ctx.user_id, Utc::now())
                .await?
                .ok_or_else(|| AppError::resource_not_found(format!("Resource {id} not found")))?;
        }

        let url = self
            .blobs
            .create_signed_url(&file.storage_path, self.signed_url_ttl)
            .await?;

        self.activity
            .record(
                ctx,
                Some(id),
                ActivityType::Download,
                json!({ "ownerId": file.owner_id }),
            )
            .await;

        Ok(url)
    }

    /// A signed download link for a file reachable through a public share token.
    ///
    /// Recorded against the owner, with the caller's client details.
    pub async fn shared_download_url(
        &self,
        token: &str,
        id: ResourceId,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<SignedUrl> {
        let file = self.downloadable(id).await?;

        let chain = self.resources.ancestor_ids(id).await?;
        let share = self
            .shares
            .find_token_grant(&chain, token, Utc::now())
            .await?
            .ok_or_else(|| AppError::resource_not_found(format!("Resource {id} not found")))?;

        let url = self
            .blobs
            .create_signed_url(&file.storage_path, self.signed_url_ttl)
            .await?;

        let ctx = RequestContext::new(file.owner_id).with_client(ip_address, user_agent);
        self.activity
            .record(
                &ctx,
                Some(id),
                ActivityType::Download,
                json!({ "via": "publicLink", "shareId": share.id }),
            )
            .await;

        Ok(url)
    }

    async fn downloadable(&self, id: ResourceId) -> AppResult<Resource> {
        let resource = self
            .resources
            .find_by_id(id)
            .await?
            .filter(|r| r.state.is_active())
            .ok_or_else(|| AppError::resource_not_found(format!("Resource {id} not found")))?;
        if resource.is_folder {
            return Err(AppError::validation("Folders cannot be downloaded"));
        }
        Ok(resource)
    }

    async fn require_active(&self, owner: UserId, id: ResourceId) -> AppResult<Resource> {
        self.resources
            .find_active(owner, id)
            .await?
            .ok_or_else(|| AppError::resource_not_found(format!("Resource {id} not found")))
    }

    async fn require_owned(&self, owner: UserId, id: ResourceId) -> AppResult<Resource> {
        self.resources
            .find_owned(owner, id)
            .await?
            .ok_or_else(|| AppError::resource_not_found(format!("Resource {id} not found")))
    }

    async fn undo_moves(&self, moved: &[(String, String)]) {
        for (from, to) in moved.iter().rev() {
            if let Err(e) = self.blobs.move_object(to, from).await {
                warn!(from = %to, to = %from, error = %e, "Failed to roll back object move");
            }
        }
    }

    async fn discard_blobs(&self, keys: &[String]) {
        if keys.is_empty() {
            return;
        }
        if let Err(e) = self.blobs.remove(keys).await {
            warn!(count = keys.len(), error = %e, "Failed to remove stored objects");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use drivehub_entity::share::{AccessLevel, ShareGrant};

    #[tokio::test]
    async fn test_create_folder_writes_placeholder_and_dedups() {
        let h = Harness::new();
        let first = h.folder("Photos", None).await;
        let second = h.folder("Photos", None).await;
        let third = h.folder("  Photos ", None).await;

        assert_eq!(first.name, "Photos");
        assert_eq!(second.name, "Photos (1)");
        assert_eq!(third.name, "Photos (2)");
        assert!(first.is_folder);
        assert_eq!(first.size, 0);
        assert!(h.blobs.contains(&first.placeholder_path()).await);
    }

    #[tokio::test]
    async fn test_create_folder_under_missing_parent() {
        let h = Harness::new();
        let err = h
            .resource_service
            .create_folder(&h.ctx(), "Docs", Some(ResourceId::new()))
            .await
            .expect_err("no parent");
        assert!(err.is(ErrorKind::ParentNotFound));
        assert!(h.blobs.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_folder_removes_placeholder_when_insert_fails() {
        let h = Harness::new();
        h.resources.fail_writes(true);
        let err = h
            .resource_service
            .create_folder(&h.ctx(), "Docs", None)
            .await
            .expect_err("insert fails");
        assert!(err.is(ErrorKind::Database));
        assert!(h.blobs.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_folder_retries_once_after_losing_a_race() {
        let h = Harness::new();
        h.resources.race_next_inserts(1);

        let folder = h.folder("Inbox", None).await;
        assert_eq!(folder.name, "Inbox (1)");
        assert!(h.blobs.contains(&folder.placeholder_path()).await);
    }

    #[tokio::test]
    async fn test_create_folder_gives_up_after_second_race() {
        let h = Harness::new();
        h.resources.race_next_inserts(2);

        let err = h
            .resource_service
            .create_folder(&h.ctx(), "Inbox", None)
            .await
            .expect_err("lost twice");
        assert!(err.is(ErrorKind::FileAlreadyExists));
        assert!(h.blobs.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_folder_rejects_bad_names() {
        let h = Harness::new();
        for name in ["", "  ", "a/b", ".."] {
            let err = h
                .resource_service
                .create_folder(&h.ctx(), name, None)
                .await
                .expect_err("invalid");
            assert!(err.is(ErrorKind::Validation), "{name:?}");
        }
    }

    #[tokio::test]
    async fn test_get_hides_other_owners() {
        let h = Harness::new();
        let folder = h.folder("Mine", None).await;
        assert_eq!(
            h.resource_service.get_resource(&h.ctx(), folder.id).await.unwrap().id,
            folder.id
        );
        let err = h
            .resource_service
            .get_resource(&h.stranger_ctx(), folder.id)
            .await
            .expect_err("stranger");
        assert!(err.is(ErrorKind::ResourceNotFound));
    }

    #[tokio::test]
    async fn test_list_builds_tree_and_meta() {
        let h = Harness::new();
        let docs = h.folder("docs", None).await;
        h.file("a.txt", Some(docs.id), b"a").await;
        h.file("b.txt", None, b"b").await;

        let page = h
            .resource_service
            .list_resources(
                &h.ctx(),
                PaginationQuery {
                    limit: Some(-1),
                    ..Default::default()
                },
            )
            .await
            .expect("list");

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].resource.name, "docs");
        assert_eq!(page.data[0].children.as_ref().map(Vec::len), Some(1));
        assert_eq!(page.meta.page_count, 1);
        assert_eq!(page.meta.items_per_page, 3);
    }

    #[tokio::test]
    async fn test_list_page_boundary_surfaces_children() {
        let h = Harness::new();
        let docs = h.folder("docs", None).await;
        h.file("a.txt", Some(docs.id), b"a").await;

        let page = h
            .resource_service
            .list_resources(
                &h.ctx(),
                PaginationQuery {
                    page: Some(2),
                    limit: Some(1),
                    include_total: true,
                    ..Default::default()
                },
            )
            .await
            .expect("list");

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].resource.name, "a.txt");
        assert_eq!(page.meta.total_count, Some(2));
        assert_eq!(page.meta.page_count, 2);
    }

    #[tokio::test]
    async fn test_rename_rejects_taken_name() {
        let h = Harness::new();
        let a = h.file("a.txt", None, b"a").await;
        h.file("b.txt", None, b"b").await;

        let err = h
            .resource_service
            .rename_resource(&h.ctx(), a.id, "b.txt")
            .await
            .expect_err("taken");
        assert!(err.is(ErrorKind::FileAlreadyExists));

        let renamed = h
            .resource_service
            .rename_resource(&h.ctx(), a.id, "c.txt")
            .await
            .expect("rename");
        assert_eq!(renamed.name, "c.txt");
        assert_eq!(renamed.storage_path, a.storage_path);
        assert!(h.activity.types().await.contains(&ActivityType::Rename));
    }

    #[tokio::test]
    async fn test_move_rewrites_paths_and_objects() {
        let h = Harness::new();
        let src = h.folder("src", None).await;
        let inner = h.folder("inner", Some(src.id)).await;
        let file = h.file("deep.txt", Some(inner.id), b"deep").await;
        let dst = h.folder("dst", None).await;

        let moved = h
            .resource_service
            .move_resource(&h.ctx(), inner.id, Some(dst.id))
            .await
            .expect("move");

        let expected_prefix = format!("{}/{}", dst.storage_path, inner.id);
        assert_eq!(moved.parent_id, Some(dst.id));
        assert_eq!(moved.storage_path, expected_prefix);

        let file_after = h.resources.get(file.id).await.expect("file row");
        assert_eq!(file_after.storage_path, format!("{expected_prefix}/{}", file.id));
        assert!(h.blobs.contains(&file_after.storage_path).await);
        assert!(!h.blobs.contains(&file.storage_path).await);
        assert!(h.blobs.contains(&moved.placeholder_path()).await);
    }

    #[tokio::test]
    async fn test_move_to_top_level() {
        let h = Harness::new();
        let dir = h.folder("dir", None).await;
        let file = h.file("x.txt", Some(dir.id), b"x").await;

        let moved = h
            .resource_service
            .move_resource(&h.ctx(), file.id, None)
            .await
            .expect("move");
        assert!(moved.is_root());
        assert_eq!(moved.storage_path, format!("user_{}/{}", h.owner, file.id));
    }

    #[tokio::test]
    async fn test_move_into_own_descendant_is_rejected() {
        let h = Harness::new();
        let a = h.folder("a", None).await;
        let b = h.folder("b", Some(a.id)).await;

        for target in [a.id, b.id] {
            let err = h
                .resource_service
                .move_resource(&h.ctx(), a.id, Some(target))
                .await
                .expect_err("cycle");
            assert!(err.is(ErrorKind::Validation));
        }
    }

    #[tokio::test]
    async fn test_move_rejects_taken_destination_name() {
        let h = Harness::new();
        let dst = h.folder("dst", None).await;
        h.file("same.txt", Some(dst.id), b"1").await;
        let file = h.file("same.txt", None, b"2").await;

        let err = h
            .resource_service
            .move_resource(&h.ctx(), file.id, Some(dst.id))
            .await
            .expect_err("taken");
        assert!(err.is(ErrorKind::FileAlreadyExists));
    }

    #[tokio::test]
    async fn test_move_rolls_back_objects_when_update_fails() {
        let h = Harness::new();
        let src = h.folder("src", None).await;
        let file = h.file("f.txt", Some(src.id), b"f").await;
        let dst = h.folder("dst", None).await;

        h.resources.fail_writes(true);
        let err = h
            .resource_service
            .move_resource(&h.ctx(), src.id, Some(dst.id))
            .await
            .expect_err("relocate fails");
        assert!(err.is(ErrorKind::Database));
        assert!(h.blobs.contains(&file.storage_path).await);
        assert!(h.blobs.contains(&src.placeholder_path()).await);
    }

    #[tokio::test]
    async fn test_move_rolls_back_objects_when_storage_fails() {
        let h = Harness::new();
        let src = h.folder("src", None).await;
        let file = h.file("f.txt", Some(src.id), b"f").await;
        let dst = h.folder("dst", None).await;

        h.blobs.fail_move_number(2);
        let err = h
            .resource_service
            .move_resource(&h.ctx(), src.id, Some(dst.id))
            .await
            .expect_err("second move fails");
        assert!(err.is(ErrorKind::Storage));
        assert!(h.blobs.contains(&file.storage_path).await);
        assert!(h.blobs.contains(&src.placeholder_path()).await);
        assert_eq!(h.resources.get(src.id).await.unwrap().parent_id, None);
    }

    #[tokio::test]
    async fn test_delete_and_restore_subtree() {
        let h = Harness::new();
        let dir = h.folder("dir", None).await;
        let file = h.file("f.txt", Some(dir.id), b"f").await;

        let deleted = h
            .resource_service
            .delete_resource(&h.ctx(), dir.id)
            .await
            .expect("delete");
        let ResourceState::Deleted(at) = deleted.state else {
            panic!("expected deleted state");
        };
        assert_eq!(h.resources.get(file.id).await.unwrap().state, ResourceState::Deleted(at));

        let err = h
            .resource_service
            .get_resource(&h.ctx(), dir.id)
            .await
            .expect_err("hidden");
        assert!(err.is(ErrorKind::ResourceNotFound));

        let restored = h
            .resource_service
            .restore_resource(&h.ctx(), dir.id)
            .await
            .expect("restore");
        assert!(restored.state.is_active());
        assert!(h.resources.get(file.id).await.unwrap().state.is_active());
    }

    #[tokio::test]
    async fn test_restore_keeps_separately_deleted_children_deleted() {
        let h = Harness::new();
        let dir = h.folder("dir", None).await;
        let early = h.file("early.txt", Some(dir.id), b"e").await;
        let late = h.file("late.txt", Some(dir.id), b"l").await;

        h.resource_service.delete_resource(&h.ctx(), early.id).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        h.resource_service.delete_resource(&h.ctx(), dir.id).await.unwrap();
        h.resource_service.restore_resource(&h.ctx(), dir.id).await.unwrap();

        assert!(h.resources.get(late.id).await.unwrap().state.is_active());
        assert!(h.resources.get(early.id).await.unwrap().state.is_deleted());
    }

    #[tokio::test]
    async fn test_restore_requires_active_parent() {
        let h = Harness::new();
        let dir = h.folder("dir", None).await;
        let file = h.file("f.txt", Some(dir.id), b"f").await;
        h.resource_service.delete_resource(&h.ctx(), dir.id).await.unwrap();

        let err = h
            .resource_service
            .restore_resource(&h.ctx(), file.id)
            .await
            .expect_err("parent deleted");
        assert!(err.is(ErrorKind::ParentNotFound));
    }

    #[tokio::test]
    async fn test_restore_of_active_resource_is_not_found() {
        let h = Harness::new();
        let dir = h.folder("dir", None).await;
        let err = h
            .resource_service
            .restore_resource(&h.ctx(), dir.id)
            .await
            .expect_err("not deleted");
        assert!(err.is(ErrorKind::ResourceNotFound));
    }

    #[tokio::test]
    async fn test_archive() {
        let h = Harness::new();
        let file = h.file("old.log", None, b"log").await;
        let archived = h
            .resource_service
            .archive_resource(&h.ctx(), file.id)
            .await
            .expect("archive");
        assert_eq!(archived.state, ResourceState::Archived);

        let err = h
            .resource_service
            .archive_resource(&h.ctx(), file.id)
            .await
            .expect_err("already archived");
        assert!(err.is(ErrorKind::ResourceNotFound));
    }

    #[tokio::test]
    async fn test_restore_unarchives() {
        let h = Harness::new();
        let file = h.file("old.log", None, b"log").await;
        h.resource_service.archive_resource(&h.ctx(), file.id).await.unwrap();

        let restored = h
            .resource_service
            .restore_resource(&h.ctx(), file.id)
            .await
            .expect("unarchive");
        assert!(restored.state.is_active());
        assert_eq!(h.activity.types().await.last(), Some(&ActivityType::Restore));

        h.resource_service.delete_resource(&h.ctx(), file.id).await.unwrap();
        let summary = h
            .resource_service
            .purge_resource(&h.ctx(), file.id)
            .await
            .expect("purge");
        assert_eq!(summary.freed_bytes, 3);
        assert_eq!(h.users.used(h.owner).await, 0);
    }

    #[tokio::test]
    async fn test_unarchive_rejects_taken_name() {
        let h = Harness::new();
        let old = h.folder("Reports", None).await;
        h.resource_service.archive_resource(&h.ctx(), old.id).await.unwrap();
        h.folder("Reports", None).await;

        let err = h
            .resource_service
            .restore_resource(&h.ctx(), old.id)
            .await
            .expect_err("name taken");
        assert!(err.is(ErrorKind::FileAlreadyExists));
        assert_eq!(h.resources.get(old.id).await.unwrap().state, ResourceState::Archived);
    }

    #[tokio::test]
    async fn test_purge_frees_quota_and_objects() {
        let h = Harness::new();
        let dir = h.folder("dir", None).await;
        let file = h.file("big.bin", Some(dir.id), &[0u8; 300]).await;
        assert_eq!(h.users.used(h.owner).await, 300);

        let err = h
            .resource_service
            .purge_resource(&h.ctx(), dir.id)
            .await
            .expect_err("must delete first");
        assert!(err.is(ErrorKind::ResourceNotFound));

        h.resource_service.delete_resource(&h.ctx(), dir.id).await.unwrap();
        let summary = h
            .resource_service
            .purge_resource(&h.ctx(), dir.id)
            .await
            .expect("purge");

        assert_eq!(summary, PurgeSummary { removed: 2, freed_bytes: 300 });
        assert_eq!(h.users.used(h.owner).await, 0);
        assert!(h.resources.get(file.id).await.is_none());
        assert!(!h.blobs.contains(&file.storage_path).await);
        assert!(!h.blobs.contains(&dir.placeholder_path()).await);
        assert_eq!(h.activity.types().await.last(), Some(&ActivityType::Purge));
    }

    #[tokio::test]
    async fn test_download_by_owner() {
        let h = Harness::new();
        let file = h.file("doc.pdf", None, b"pdf").await;
        let url = h
            .resource_service
            .download_url(&h.ctx(), file.id)
            .await
            .expect("url");
        assert!(url.signed_url.contains(&file.storage_path));
        assert!(url.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_download_of_folder_is_rejected() {
        let h = Harness::new();
        let dir = h.folder("dir", None).await;
        let err = h
            .resource_service
            .download_url(&h.ctx(), dir.id)
            .await
            .expect_err("folder");
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_download_through_folder_grant() {
        let h = Harness::new();
        let dir = h.folder("shared", None).await;
        let file = h.file("doc.pdf", Some(dir.id), b"pdf").await;
        let stranger = h.stranger_ctx();

        let err = h
            .resource_service
            .download_url(&stranger, file.id)
            .await
            .expect_err("no grant");
        assert!(err.is(ErrorKind::ResourceNotFound));

        h.share_service
            .create_share(
                &h.ctx(),
                dir.id,
                ShareGrant::User {
                    user_id: stranger.user_id,
                    access_level: AccessLevel::Viewer,
                },
                None,
            )
            .await
            .expect("share");

        h.resource_service
            .download_url(&stranger, file.id)
            .await
            .expect("granted");
    }

    #[tokio::test]
    async fn test_download_through_public_token() {
        let h = Harness::new();
        let file = h.file("doc.pdf", None, b"pdf").await;
        let share = h
            .share_service
            .create_share(
                &h.ctx(),
                file.id,
                ShareGrant::Public {
                    access_level: AccessLevel::Viewer,
                },
                None,
            )
            .await
            .expect("share");
        let token = share.public_link_token.clone().expect("token");

        h.resource_service
            .shared_download_url(&token, file.id, None, None)
            .await
            .expect("token works");

        let err = h
            .resource_service
            .shared_download_url(&"0".repeat(64), file.id, None, None)
            .await
            .expect_err("wrong token");
        assert!(err.is(ErrorKind::ResourceNotFound));

        h.share_service
            .revoke_share(&h.ctx(), share.id)
            .await
            .expect("revoke");
        assert!(h
            .resource_service
            .shared_download_url(&token, file.id, None, None)
            .await
            .is_err());
    }
}
