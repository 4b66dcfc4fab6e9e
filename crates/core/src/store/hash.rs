//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key for a response produced from `input` by the
/// pipeline named `namespace`.
///
/// Input is trimmed first so whitespace-only edits to an article hit the
/// same entry.
pub fn compute_cache_key(namespace: &str, input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b"\n");
    hasher.update(input.trim().as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `key` looks like a key produced by [`compute_cache_key`].
pub fn is_valid_key(key: &str) -> bool {
    key.len() == 64 && key.chars().all(|c| c.is_ascii_hexdigit())
}
