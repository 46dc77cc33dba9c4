//! Application layer services implementing business logic.
//!
//! Services coordinate repository and reputation calls, validation, and
//! business rules, and expose a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::click_service::ClickService`] - Click ingestion with deduplication
//! - [`services::bad_domain_service::BadDomainService`] - Bad domain registry management

pub mod services;
