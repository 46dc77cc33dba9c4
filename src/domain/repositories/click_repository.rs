//! Repository trait for click data access.

use crate::domain::entities::{Click, DedupKey, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Result of an insert attempt.
///
/// Uniqueness violations are expected outcomes of ingestion, not failures, so
/// implementations classify them here instead of returning an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(Click),
    /// Another click already uses the generated id.
    DuplicateId,
    /// Another click with the same dedup key was stored first.
    DuplicateKey,
}

/// Repository interface for clicks.
///
/// The store is the single source of truth for existence checks and must
/// enforce uniqueness of both `id` and the dedup key at the constraint level.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryClickRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Finds the first stored click (by creation time) matching the key exactly.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn find_by_dedup_key(&self, key: &DedupKey) -> Result<Option<Click>, AppError>;

    /// Finds a click by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn find_by_id(&self, id: &str) -> Result<Option<Click>, AppError>;

    /// Persists a new click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] when the store is unavailable or
    /// rejects the row for a reason other than id or dedup key uniqueness.
    async fn insert(&self, new_click: NewClick) -> Result<InsertOutcome, AppError>;

    /// Counts stored clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}
