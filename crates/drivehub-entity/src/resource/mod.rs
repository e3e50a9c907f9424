//! Resource (file and folder) domain entities.

pub mod model;
pub mod tree;

pub use model::{
    NewResource, Resource, ResourceRow, ResourceState, ResourceStatus, folder_placeholder_path,
};
pub use tree::ResourceNode;
