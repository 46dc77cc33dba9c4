//! In-process bad domain registry.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{BadDomain, NewBadDomain};
use crate::domain::repositories::BadDomainRepository;
use crate::error::AppError;

/// A bad domain registry kept in process memory, ordered by domain name.
#[derive(Default)]
pub struct InMemoryBadDomainRepository {
    domains: RwLock<BTreeMap<String, BadDomain>>,
}

impl InMemoryBadDomainRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BadDomainRepository for InMemoryBadDomainRepository {
    async fn add(&self, new_domain: NewBadDomain) -> Result<BadDomain, AppError> {
        let mut domains = self.domains.write().await;

        if domains.contains_key(&new_domain.domain) {
            return Err(AppError::conflict(
                "Domain is already registered",
                json!({ "domain": new_domain.domain }),
            ));
        }

        let entry = BadDomain {
            domain: new_domain.domain,
            reason: new_domain.reason,
            created_at: Utc::now(),
        };
        domains.insert(entry.domain.clone(), entry.clone());

        Ok(entry)
    }

    async fn remove(&self, domain: &str) -> Result<bool, AppError> {
        Ok(self.domains.write().await.remove(domain).is_some())
    }

    async fn list(&self) -> Result<Vec<BadDomain>, AppError> {
        Ok(self.domains.read().await.values().cloned().collect())
    }

    async fn contains_any(&self, domains: &[String]) -> Result<bool, AppError> {
        let registered = self.domains.read().await;
        Ok(domains.iter().any(|d| registered.contains_key(d)))
    }
}
