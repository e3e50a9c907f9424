//! S3-compatible object storage (requires the `s3` feature).

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info};

use drivehub_core::config::S3StorageConfig;
use drivehub_core::error::{AppError, ErrorKind};
use drivehub_core::result::AppResult;
use drivehub_core::traits::{BlobStore, SignedUrl, UploadOptions};

/// DeleteObjects accepts at most this many keys per request.
const DELETE_BATCH: usize = 1000;

/// Blob store backed by a single S3 bucket.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Build a client from configuration.
    ///
    /// Empty credentials fall back to the default AWS credential chain and an
    /// empty endpoint targets AWS itself.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must be set"));
        }
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 blob store"
        );

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "drivehub-config",
            ));
        }
        if !config.endpoint.is_empty() {
            loader = loader.endpoint_url(config.endpoint.clone());
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        })
    }

    fn key(path: &str) -> &str {
        path.trim_start_matches('/')
    }
}

fn storage_error<E>(message: String) -> impl FnOnce(E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| AppError::with_source(ErrorKind::Storage, message, e)
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok())
    }

    async fn upload(&self, path: &str, data: Bytes, options: UploadOptions) -> AppResult<String> {
        let key = Self::key(path);
        if !options.upsert && self.exists(key).await? {
            return Err(AppError::conflict(format!("Object already exists: {path}")));
        }
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(options.content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(storage_error(format!("Failed to upload object: {path}")))?;
        debug!(key, bytes = size, "Stored object");
        Ok(key.to_string())
    }

    async fn read(&self, path: &str) -> AppResult<Bytes> {
        let key = Self::key(path);
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    AppError::not_found(format!("Object not found: {path}"))
                } else {
                    AppError::with_source(ErrorKind::Storage, format!("Failed to read object: {path}"), e)
                }
            })?;
        let body = output
            .body
            .collect()
            .await
            .map_err(storage_error(format!("Failed to read object body: {path}")))?;
        Ok(body.into_bytes())
    }

    async fn remove(&self, paths: &[String]) -> AppResult<()> {
        for chunk in paths.chunks(DELETE_BATCH) {
            let objects = chunk
                .iter()
                .map(|p| ObjectIdentifier::builder().key(Self::key(p)).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(storage_error("Invalid object key".to_string()))?;
            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(storage_error("Invalid delete request".to_string()))?;
            self.client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(storage_error(format!("Failed to remove {} objects", chunk.len())))?;
        }
        Ok(())
    }

    async fn move_object(&self, from: &str, to: &str) -> AppResult<()> {
        let (from_key, to_key) = (Self::key(from), Self::key(to));
        self.client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, from_key))
            .key(to_key)
            .send()
            .await
            .map_err(storage_error(format!("Failed to copy {from} -> {to}")))?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(from_key)
            .send()
            .await
            .map_err(storage_error(format!("Failed to delete moved object: {from}")))?;
        debug!(from = from_key, to = to_key, "Moved object");
        Ok(())
    }

    async fn create_signed_url(&self, path: &str, expires_in: Duration) -> AppResult<SignedUrl> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(storage_error("Invalid signed URL lifetime".to_string()))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(Self::key(path))
            .presigned(presigning)
            .await
            .map_err(storage_error(format!("Failed to sign URL for {path}")))?;
        let ttl = chrono::Duration::from_std(expires_in)
            .map_err(|_| AppError::validation("Signed URL lifetime is too large"))?;
        Ok(SignedUrl {
            signed_url: request.uri().to_string(),
            expires_at: Utc::now() + ttl,
        })
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(Self::key(path))
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to check object: {path}"),
                e,
            )),
        }
    }
}
