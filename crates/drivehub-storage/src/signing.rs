//! Signed download links for stores without native presigning.
//!
//! A link has the form `{base}/blobs/{path}?expires={unix}&signature={hex}`
//! where the signature is the SHA-256 of `secret`, `path` and `expires`
//! joined by newlines. The API layer verifies it before serving the blob.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use sha2::{Digest, Sha256};

use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::SignedUrl;

/// Produces and checks signed blob URLs.
#[derive(Clone)]
pub struct UrlSigner {
    base_url: String,
    secret: String,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UrlSigner {
    /// Create a signer for links under `base_url`.
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: secret.into(),
        }
    }

    /// Sign `path` for `expires_in` starting at `now`.
    pub fn sign_at(&self, path: &str, expires_in: Duration, now: DateTime<Utc>) -> AppResult<SignedUrl> {
        let ttl = chrono::Duration::from_std(expires_in)
            .map_err(|_| AppError::validation("Signed URL lifetime is too large"))?;
        let expires_at = now + ttl;
        let expires = expires_at.timestamp();
        let signature = self.signature(path, expires);
        Ok(SignedUrl {
            signed_url: format!(
                "{}/blobs/{}?expires={expires}&signature={signature}",
                self.base_url,
                path.trim_start_matches('/')
            ),
            expires_at: Utc.timestamp_opt(expires, 0).single().unwrap_or(expires_at),
        })
    }

    /// Sign `path` for `expires_in` from now.
    pub fn sign(&self, path: &str, expires_in: Duration) -> AppResult<SignedUrl> {
        self.sign_at(path, expires_in, Utc::now())
    }

    /// Check a link's signature and expiry at `now`.
    pub fn verify_at(&self, path: &str, expires: i64, signature: &str, now: DateTime<Utc>) -> bool {
        if now.timestamp() > expires {
            return false;
        }
        let expected = self.signature(path.trim_start_matches('/'), expires);
        constant_time_eq(expected.as_bytes(), signature.to_ascii_lowercase().as_bytes())
    }

    /// Check a link's signature and expiry now.
    pub fn verify(&self, path: &str, expires: i64, signature: &str) -> bool {
        self.verify_at(path, expires, signature, Utc::now())
    }

    fn signature(&self, path: &str, expires: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b"\n");
        hasher.update(path.trim_start_matches('/').as_bytes());
        hasher.update(b"\n");
        hasher.update(expires.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
