//! Blob storage and quota configuration.

use serde::{Deserialize, Serialize};

/// Which blob store backs resource content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderKind {
    /// Local filesystem under `local.root_path`.
    #[default]
    Local,
    /// Process memory. Contents are lost on restart.
    Memory,
    /// S3-compatible object storage (requires the `s3` feature).
    S3,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Blob store backend.
    #[serde(default)]
    pub provider: StorageProviderKind,
    /// Maximum accepted upload size in bytes (default 50 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// How many leading bytes of a file are hashed for duplicate detection.
    #[serde(default = "default_hash_prefix")]
    pub hash_prefix_bytes: usize,
    /// Quota assigned to users created without an explicit one (default 1 GiB).
    #[serde(default = "default_quota")]
    pub default_quota_bytes: i64,
    /// Public base URL that signed download links are built on.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Secret used to sign download links for the local and memory stores.
    #[serde(default = "default_signing_secret")]
    pub signing_secret: String,
    /// Lifetime of signed download links in seconds.
    #[serde(default = "default_signed_url_expiry")]
    pub signed_url_expiry_seconds: u64,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProviderKind::default(),
            max_upload_size_bytes: default_max_upload(),
            hash_prefix_bytes: default_hash_prefix(),
            default_quota_bytes: default_quota(),
            public_base_url: default_public_base_url(),
            signing_secret: default_signing_secret(),
            signed_url_expiry_seconds: default_signed_url_expiry(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for local blob storage.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct S3StorageConfig {
    /// Endpoint URL for non-AWS services such as MinIO. Empty means AWS.
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Bucket holding all resource blobs.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID. Empty falls back to the default credential chain.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (needed by most self-hosted services).
    #[serde(default)]
    pub force_path_style: bool,
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MB
}

fn default_hash_prefix() -> usize {
    1024 * 1024
}

fn default_quota() -> i64 {
    1_073_741_824 // 1 GiB
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_signing_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_signed_url_expiry() -> u64 {
    3600
}

fn default_local_root() -> String {
    "./data/blobs".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}
