//! Domain layer containing business entities and ports.
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository and reputation traits define contracts implemented by
//! the infrastructure layer; orchestration lives in
//! [`crate::application::services`].
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions
//! - [`reputation`] - Referrer reputation port
//! - [`ingest_outcome`] - Two-variant result of click ingestion
//!
//! # Click Ingestion Flow
//!
//! 1. The request layer builds [`entities::ClickAttributes`] from plain strings
//! 2. [`crate::application::services::ClickService::ingest`] validates them
//! 3. The store is queried by [`entities::DedupKey`]
//! 4. A match yields [`ingest_outcome::IngestOutcome::Existing`]; otherwise a
//!    new click is flagged via [`reputation::DomainReputation`], inserted, and
//!    returned as [`ingest_outcome::IngestOutcome::Created`]

pub mod entities;
pub mod ingest_outcome;
pub mod repositories;
pub mod reputation;
