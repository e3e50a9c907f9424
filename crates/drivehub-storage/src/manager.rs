//! Storage manager: builds the configured blob store and holds the link signer.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use drivehub_core::config::{StorageConfig, StorageProviderKind};
use drivehub_core::result::AppResult;
use drivehub_core::traits::BlobStore;

use crate::providers::{LocalBlobStore, MemoryBlobStore};
use crate::signing::UrlSigner;

/// The process-wide blob store plus what is needed to serve its signed links.
#[derive(Debug, Clone)]
pub struct StorageManager {
    store: Arc<dyn BlobStore>,
    signer: UrlSigner,
    signed_url_ttl: Duration,
}

impl StorageManager {
    /// Build the blob store selected by `config.provider`.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let signer = UrlSigner::new(&config.public_base_url, &config.signing_secret);
        let store: Arc<dyn BlobStore> = match config.provider {
            StorageProviderKind::Local => {
                Arc::new(LocalBlobStore::new(&config.local.root_path, signer.clone()).await?)
            }
            StorageProviderKind::Memory => Arc::new(MemoryBlobStore::new(signer.clone())),
            #[cfg(feature = "s3")]
            StorageProviderKind::S3 => Arc::new(crate::providers::S3BlobStore::new(&config.s3).await?),
            #[cfg(not(feature = "s3"))]
            StorageProviderKind::S3 => {
                return Err(drivehub_core::AppError::configuration(
                    "storage.provider = \"s3\" requires building with the `s3` feature",
                ));
            }
        };
        info!(provider = store.provider_type(), "Blob store ready");

        Ok(Self::new(
            store,
            signer,
            Duration::from_secs(config.signed_url_expiry_seconds),
        ))
    }

    /// Wrap an existing store.
    pub fn new(store: Arc<dyn BlobStore>, signer: UrlSigner, signed_url_ttl: Duration) -> Self {
        Self {
            store,
            signer,
            signed_url_ttl,
        }
    }

    /// The blob store.
    pub fn store(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.store)
    }

    /// Signer for `/blobs/...` links.
    pub fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    /// Lifetime of generated download links.
    pub fn signed_url_ttl(&self) -> Duration {
        self.signed_url_ttl
    }

    /// Whether the backend is reachable.
    pub async fn health_check(&self) -> bool {
        self.store.health_check().await.unwrap_or(false)
    }
}
