//! Registry entry for an untrustworthy referrer domain.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A domain flagged as untrustworthy.
///
/// `domain` is always a lowercase host name (or IP literal). Registering a
/// domain also flags all of its subdomains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadDomain {
    pub domain: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input data for registering a bad domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBadDomain {
    pub domain: String,
    pub reason: Option<String>,
}
