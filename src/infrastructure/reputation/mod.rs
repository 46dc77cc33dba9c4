//! Referrer reputation implementations.
//!
//! - [`BadDomainRegistry`] - Flags referrers whose host (or a parent domain)
//!   is registered in a [`crate::domain::repositories::BadDomainRepository`]

pub mod bad_domain_registry;

pub use bad_domain_registry::BadDomainRegistry;
