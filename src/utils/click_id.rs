//! Click identifier generation.
//!
//! Identifiers are 128-bit time + random composites: 48 bits of Unix
//! milliseconds (big-endian) followed by 80 bits from the OS CSPRNG, encoded
//! as 32 lowercase hex characters. Sorting ids lexicographically orders them
//! by creation time.

use crate::error::AppError;
use chrono::Utc;
use serde_json::json;

/// Length of the hex-encoded identifier.
pub const CLICK_ID_LEN: usize = 32;

const TIMESTAMP_BYTES: usize = 6;
const RANDOM_BYTES: usize = 10;

/// Generates a new click identifier.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let id = generate_click_id()?;
/// assert_eq!(id.len(), 32);
/// ```
pub fn generate_click_id() -> Result<String, AppError> {
    let mut buffer = [0u8; TIMESTAMP_BYTES + RANDOM_BYTES];

    let millis = Utc::now().timestamp_millis().max(0) as u64;
    buffer[..TIMESTAMP_BYTES].copy_from_slice(&millis.to_be_bytes()[8 - TIMESTAMP_BYTES..]);

    getrandom::fill(&mut buffer[TIMESTAMP_BYTES..]).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(hex::encode(buffer))
}

/// Returns `true` if `id` has the shape of a generated click id.
pub fn is_valid_click_id(id: &str) -> bool {
    id.len() == CLICK_ID_LEN && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
