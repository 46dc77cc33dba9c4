//! Fixed-size digest of a click's dedup key.

use sha2::{Digest, Sha256};

use crate::domain::entities::DedupKey;

/// Length of the digest in bytes.
pub const DEDUP_DIGEST_LEN: usize = 32;

/// Hashes the dedup key with SHA-256.
///
/// Each field is written as its byte length (`u64`, big-endian) followed by
/// its bytes, so no two distinct keys share an encoding. The PostgreSQL store
/// enforces key uniqueness on this digest, which keeps index entries small
/// however long the fields are.
///
/// # Examples
///
/// ```ignore
/// let digest = dedup_digest(&attributes.dedup_key());
/// assert_eq!(digest.len(), DEDUP_DIGEST_LEN);
/// ```
pub fn dedup_digest(key: &DedupKey) -> Vec<u8> {
    let mut hasher = Sha256::new();
    for field in [&key.user_agent, &key.user_ip, &key.referrer, &key.param1] {
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field.as_bytes());
    }
    hasher.finalize().to_vec()
}
