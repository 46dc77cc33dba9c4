//! HTTP request handlers.

pub mod click;
pub mod health;

pub use click::{get_click_handler, ingest_click_handler};
pub use health::health_handler;
