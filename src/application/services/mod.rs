//! Business logic services for the application layer.

pub mod bad_domain_service;
pub mod click_service;

pub use bad_domain_service::BadDomainService;
pub use click_service::ClickService;
