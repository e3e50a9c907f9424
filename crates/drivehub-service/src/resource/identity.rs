//! Identifier and storage path generation for new resources.

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::types::{ResourceId, UserId};
use drivehub_database::ResourceStore;

/// A freshly minted resource id and the blob key it will live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAndPath {
    /// New resource id.
    pub id: ResourceId,
    /// Storage path ending in the id.
    pub storage_path: String,
}

/// Storage path of a top-level resource.
pub fn root_storage_path(owner: UserId, id: ResourceId) -> String {
    format!("user_{owner}/{id}")
}

/// Storage path of a resource placed in a folder stored at `parent_path`.
pub fn child_storage_path(parent_path: &str, id: ResourceId) -> String {
    format!("{parent_path}/{id}")
}

/// Mint an id and derive its storage path under `parent_id`.
///
/// The parent must be an active folder owned by `owner`; anything else
/// fails with `ParentNotFound`.
pub async fn generate_id_and_path(
    store: &dyn ResourceStore,
    owner: UserId,
    parent_id: Option<ResourceId>,
) -> AppResult<IdAndPath> {
    let id = ResourceId::new();

    let storage_path = match parent_id {
        None => root_storage_path(owner, id),
        Some(parent_id) => {
            let parent = store
                .find_owned_folder(owner, parent_id)
                .await?
                .ok_or_else(|| {
                    AppError::parent_not_found(format!("Parent folder {parent_id} not found"))
                })?;
            child_storage_path(&parent.storage_path, id)
        }
    };

    Ok(IdAndPath { id, storage_path })
}
