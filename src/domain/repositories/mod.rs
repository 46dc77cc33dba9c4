//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented in `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`ClickRepository`] - Click lookup by id or dedup key, and insertion
//! - [`BadDomainRepository`] - Referrer reputation registry
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod bad_domain_repository;
pub mod click_repository;

pub use bad_domain_repository::BadDomainRepository;
pub use click_repository::{ClickRepository, InsertOutcome};

#[cfg(test)]
pub use bad_domain_repository::MockBadDomainRepository;
#[cfg(test)]
pub use click_repository::MockClickRepository;
