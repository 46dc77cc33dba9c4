//! Click entity and the inputs used to create one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::error::AppError;

/// A recorded visit of a tracked link.
///
/// Clicks are immutable once persisted: there is no update path, and a later
/// observation with the same [`DedupKey`] resolves to the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Click {
    pub id: String,
    pub user_agent: String,
    pub user_ip: String,
    pub referrer: String,
    pub param1: String,
    pub param2: String,
    /// Set once from the referrer reputation check and never recomputed.
    pub is_bad_domain: bool,
    /// The click was stored, but part of its creation (the reputation lookup)
    /// failed and the caller should know about it.
    pub has_error: bool,
    pub created_at: DateTime<Utc>,
}

impl Click {
    /// Returns the deduplication key of this click.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            user_agent: self.user_agent.clone(),
            user_ip: self.user_ip.clone(),
            referrer: self.referrer.clone(),
            param1: self.param1.clone(),
        }
    }
}

/// Caller-supplied attributes of a candidate click.
///
/// The request layer hands these over as plain strings; nothing here parses
/// HTTP or normalizes values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickAttributes {
    pub user_agent: String,
    pub user_ip: String,
    pub referrer: String,
    pub param1: String,
    pub param2: String,
}

impl ClickAttributes {
    pub fn new(
        user_agent: impl Into<String>,
        user_ip: impl Into<String>,
        referrer: impl Into<String>,
        param1: impl Into<String>,
        param2: impl Into<String>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            user_ip: user_ip.into(),
            referrer: referrer.into(),
            param1: param1.into(),
            param2: param2.into(),
        }
    }

    /// Checks that every attribute is non-empty and free of NUL characters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] naming all empty fields, or, when
    /// none is empty, all fields containing `\0`.
    pub fn validate(&self) -> Result<(), AppError> {
        let fields = [
            ("user_agent", &self.user_agent),
            ("user_ip", &self.user_ip),
            ("referrer", &self.referrer),
            ("param1", &self.param1),
            ("param2", &self.param2),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::missing_fields(&missing));
        }

        let invalid: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.contains('\0'))
            .map(|(name, _)| *name)
            .collect();
        if !invalid.is_empty() {
            return Err(AppError::bad_request(
                format!("Fields contain NUL characters: {}", invalid.join(", ")),
                json!({ "invalid_fields": invalid }),
            ));
        }

        Ok(())
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            user_agent: self.user_agent.clone(),
            user_ip: self.user_ip.clone(),
            referrer: self.referrer.clone(),
            param1: self.param1.clone(),
        }
    }
}

/// The natural key that decides whether two clicks are the same.
///
/// `param2` is deliberately absent. Comparison is byte-exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub user_agent: String,
    pub user_ip: String,
    pub referrer: String,
    pub param1: String,
}

/// Input data for persisting a new click.
///
/// The creation timestamp is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub id: String,
    pub attributes: ClickAttributes,
    pub is_bad_domain: bool,
    pub has_error: bool,
}

impl NewClick {
    pub fn dedup_key(&self) -> DedupKey {
        self.attributes.dedup_key()
    }

    /// Materializes the stored entity with the given creation time.
    pub fn into_click(self, created_at: DateTime<Utc>) -> Click {
        Click {
            id: self.id,
            user_agent: self.attributes.user_agent,
            user_ip: self.attributes.user_ip,
            referrer: self.attributes.referrer,
            param1: self.attributes.param1,
            param2: self.attributes.param2,
            is_bad_domain: self.is_bad_domain,
            has_error: self.has_error,
            created_at,
        }
    }
}
