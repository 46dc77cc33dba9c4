//! Registry-backed referrer reputation check.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::repositories::BadDomainRepository;
use crate::domain::reputation::DomainReputation;
use crate::error::AppError;
use crate::utils::referrer_host::{extract_host, host_candidates};

/// Flags a referrer when its host, or any parent domain of it, is registered.
///
/// Referrers without an extractable host are never flagged.
pub struct BadDomainRegistry<R: BadDomainRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: BadDomainRepository + ?Sized> BadDomainRegistry<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: BadDomainRepository + ?Sized> DomainReputation for BadDomainRegistry<R> {
    async fn is_bad_domain(&self, referrer: &str) -> Result<bool, AppError> {
        let Some(host) = extract_host(referrer) else {
            debug!(referrer, "Referrer has no host, skipping reputation check");
            return Ok(false);
        };

        let candidates = host_candidates(&host);
        let flagged = self.repository.contains_any(&candidates).await?;

        debug!(referrer_host = %host, flagged, "Reputation check");
        Ok(flagged)
    }
}
