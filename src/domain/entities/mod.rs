//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs live next to the entity
//! they produce:
//!
//! - [`Click`] - a recorded click, built from [`NewClick`]
//! - [`ClickAttributes`] - caller-supplied click data, and its [`DedupKey`]
//! - [`BadDomain`] - a reputation registry entry, built from [`NewBadDomain`]

pub mod bad_domain;
pub mod click;

pub use bad_domain::{BadDomain, NewBadDomain};
pub use click::{Click, ClickAttributes, DedupKey, NewClick};
