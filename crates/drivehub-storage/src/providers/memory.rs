//! In-process blob store. Contents live only as long as the process.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::{BlobStore, SignedUrl, UploadOptions};

use crate::signing::UrlSigner;

/// Blob store backed by a shared map.
#[derive(Debug, Clone)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
    signer: UrlSigner,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new(signer: UrlSigner) -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            signer,
        }
    }

    /// Sorted list of stored keys.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn key(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn upload(&self, path: &str, data: Bytes, options: UploadOptions) -> AppResult<String> {
        let key = key(path);
        let mut objects = self.objects.write().await;
        if !options.upsert && objects.contains_key(&key) {
            return Err(AppError::conflict(format!("Object already exists: {path}")));
        }
        objects.insert(key.clone(), data);
        Ok(key)
    }

    async fn read(&self, path: &str) -> AppResult<Bytes> {
        self.objects
            .read()
            .await
            .get(&key(path))
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Object not found: {path}")))
    }

    async fn remove(&self, paths: &[String]) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        for path in paths {
            objects.remove(&key(path));
        }
        Ok(())
    }

    async fn move_object(&self, from: &str, to: &str) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        let data = objects
            .remove(&key(from))
            .ok_or_else(|| AppError::not_found(format!("Object not found: {from}")))?;
        objects.insert(key(to), data);
        Ok(())
    }

    async fn create_signed_url(&self, path: &str, expires_in: Duration) -> AppResult<SignedUrl> {
        self.signer.sign(path, expires_in)
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.objects.read().await.contains_key(&key(path)))
    }
}
