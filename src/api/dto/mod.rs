//! Data Transfer Objects for API requests and responses.

pub mod click;
pub mod health;
