//! Content fingerprints for duplicate detection.

use sha2::{Digest, Sha256};

/// Bytes hashed when no prefix length is configured (1 MiB).
pub const DEFAULT_HASH_PREFIX_BYTES: usize = 1024 * 1024;

/// Lowercase hex SHA-256 of the first `max_bytes` of `content`.
///
/// Only the prefix is hashed, so two files that differ after `max_bytes`
/// share a fingerprint.
pub fn compute_file_hash(content: &[u8], max_bytes: usize) -> String {
    let prefix = &content[..content.len().min(max_bytes)];
    let mut hasher = Sha256::new();
    hasher.update(prefix);
    hex::encode(hasher.finalize())
}
