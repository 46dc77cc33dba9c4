//! Helper functions used across the application:
//!
//! - [`click_id`] - Click identifier generation
//! - [`referrer_host`] - Host extraction for reputation checks
//! - [`client_ip`] - Client address and header extraction from HTTP requests
//! - [`dedup_digest`] - SHA-256 digest of a click's dedup key
//! - [`db_error`] - PostgreSQL constraint violation classification

pub mod click_id;
pub mod client_ip;
pub mod db_error;
pub mod dedup_digest;
pub mod referrer_host;
