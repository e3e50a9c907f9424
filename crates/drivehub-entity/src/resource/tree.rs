//! Resource tree structures for hierarchical listings.

use serde::{Deserialize, Serialize};

use super::model::Resource;

/// A resource with its nested children.
///
/// Folder nodes always carry a `children` array (possibly empty); file
/// nodes carry none, so the field is omitted when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// The resource itself.
    #[serde(flatten)]
    pub resource: Resource,
    /// Child nodes (folders only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ResourceNode>>,
}

impl ResourceNode {
    /// Wrap a resource as a childless node.
    pub fn new(resource: Resource) -> Self {
        let children = resource.is_folder.then(Vec::new);
        Self { resource, children }
    }

    /// Whether this node can hold children.
    pub fn is_folder(&self) -> bool {
        self.children.is_some()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            if let Some(children) = &node.children {
                stack.extend(children.iter());
            }
        }
        count
    }
}
