//! Repository trait for the bad domain registry.

use crate::domain::entities::{BadDomain, NewBadDomain};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for registered bad domains.
///
/// Callers pass already-normalized lowercase hosts; see
/// [`crate::utils::referrer_host`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadDomainRepository: Send + Sync {
    /// Registers a domain.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the domain is already registered.
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn add(&self, new_domain: NewBadDomain) -> Result<BadDomain, AppError>;

    /// Removes a domain. Returns `Ok(false)` if it was not registered.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn remove(&self, domain: &str) -> Result<bool, AppError>;

    /// Lists registered domains ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn list(&self) -> Result<Vec<BadDomain>, AppError>;

    /// Returns `true` if any of the given domains is registered.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn contains_any(&self, domains: &[String]) -> Result<bool, AppError>;
}
