//! Referrer reputation port.

use crate::error::AppError;
use async_trait::async_trait;

/// Decides whether a referrer belongs to an untrustworthy domain.
///
/// Consulted once per newly created click. The answer is stored on the click
/// and never recomputed.
///
/// # Implementations
///
/// - [`crate::infrastructure::reputation::BadDomainRegistry`] - registry-backed check
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainReputation: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the reputation source cannot be consulted.
    async fn is_bad_domain(&self, referrer: &str) -> Result<bool, AppError>;
}
