//! Files and folders: naming, hashing, hierarchy and lifecycle.

pub mod hashing;
pub mod identity;
pub mod naming;
pub mod service;
pub mod tree;

pub use hashing::{DEFAULT_HASH_PREFIX_BYTES, compute_file_hash};
pub use identity::{IdAndPath, generate_id_and_path};
pub use naming::{get_unique_name, next_unique_name, validate_name};
pub use service::{PurgeSummary, ResourceService, blob_key};
pub use tree::{build_tree, flatten};
