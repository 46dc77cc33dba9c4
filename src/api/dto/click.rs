//! DTOs for click endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Click;
use crate::domain::ingest_outcome::IngestOutcome;

/// Query string of `GET /click`.
///
/// Missing parameters are treated as empty strings and rejected by
/// validation together with any missing headers.
#[derive(Debug, Default, Deserialize)]
pub struct IngestQuery {
    #[serde(default)]
    pub param1: String,
    #[serde(default)]
    pub param2: String,
}

/// Response of `GET /click`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub click_id: String,
    /// `true` if the click had already been recorded.
    pub existing: bool,
    pub is_bad_domain: bool,
    pub has_error: bool,
}

impl From<&IngestOutcome> for IngestResponse {
    fn from(outcome: &IngestOutcome) -> Self {
        let click = outcome.click();
        Self {
            click_id: click.id.clone(),
            existing: outcome.was_existing(),
            is_bad_domain: click.is_bad_domain,
            has_error: click.has_error,
        }
    }
}

/// Full click record returned by `GET /api/clicks/{id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClickResponse {
    pub id: String,
    pub user_agent: String,
    pub user_ip: String,
    pub referrer: String,
    pub param1: String,
    pub param2: String,
    pub is_bad_domain: bool,
    pub has_error: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Click> for ClickResponse {
    fn from(click: Click) -> Self {
        Self {
            id: click.id,
            user_agent: click.user_agent,
            user_ip: click.user_ip,
            referrer: click.referrer,
            param1: click.param1,
            param2: click.param2,
            is_bad_domain: click.is_bad_domain,
            has_error: click.has_error,
            created_at: click.created_at,
        }
    }
}
