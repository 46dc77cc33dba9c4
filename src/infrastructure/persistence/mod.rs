//! Repository implementations.
//!
//! # PostgreSQL
//!
//! - [`PgClickRepository`] - Click storage with constraint-level deduplication
//! - [`PgBadDomainRepository`] - Bad domain registry
//!
//! # In-memory
//!
//! - [`InMemoryClickRepository`] - Process-local click store
//! - [`InMemoryBadDomainRepository`] - Process-local registry

pub mod memory_bad_domain_repository;
pub mod memory_click_repository;
pub mod pg_bad_domain_repository;
pub mod pg_click_repository;

pub use memory_bad_domain_repository::InMemoryBadDomainRepository;
pub use memory_click_repository::InMemoryClickRepository;
pub use pg_bad_domain_repository::PgBadDomainRepository;
pub use pg_click_repository::PgClickRepository;
