//! Bad domain registry management.

use crate::domain::entities::{BadDomain, NewBadDomain};
use crate::domain::repositories::BadDomainRepository;
use crate::error::AppError;
use crate::utils::referrer_host::extract_host;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Service for maintaining the registry consulted by
/// [`crate::infrastructure::reputation::BadDomainRegistry`].
///
/// Inputs are normalized with the same host extraction the reputation check
/// applies to referrers, so `http://Known-Bad.tld/x` registers `known-bad.tld`.
pub struct BadDomainService<R: BadDomainRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: BadDomainRepository + ?Sized> BadDomainService<R> {
    /// Creates a new bad domain service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Registers a domain.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if no host can be extracted.
    /// Returns [`AppError::Conflict`] if the domain is already registered.
    /// Returns [`AppError::Persistence`] on storage errors.
    pub async fn add_domain(
        &self,
        input: &str,
        reason: Option<String>,
    ) -> Result<BadDomain, AppError> {
        let domain = Self::normalize(input)?;

        let created = self
            .repository
            .add(NewBadDomain {
                domain,
                reason: reason.filter(|r| !r.trim().is_empty()),
            })
            .await?;

        info!(domain = %created.domain, "Bad domain registered");
        Ok(created)
    }

    /// Removes a domain.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if no host can be extracted.
    /// Returns [`AppError::NotFound`] if the domain is not registered.
    pub async fn remove_domain(&self, input: &str) -> Result<(), AppError> {
        let domain = Self::normalize(input)?;

        if !self.repository.remove(&domain).await? {
            return Err(AppError::not_found(
                "Domain is not registered",
                json!({ "domain": domain }),
            ));
        }

        info!(domain = %domain, "Bad domain removed");
        Ok(())
    }

    /// Lists registered domains.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    pub async fn list_domains(&self) -> Result<Vec<BadDomain>, AppError> {
        self.repository.list().await
    }

    /// Registers every domain of a seed list, keeping existing entries.
    ///
    /// Returns the number of newly registered domains.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an entry without a host.
    /// Returns [`AppError::Persistence`] on storage errors.
    pub async fn seed(&self, domains: &[String]) -> Result<usize, AppError> {
        let mut added = 0;

        for input in domains {
            match self.add_domain(input, Some("seeded from BAD_DOMAINS".to_string())).await {
                Ok(_) => added += 1,
                Err(AppError::Conflict { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(added)
    }

    fn normalize(input: &str) -> Result<String, AppError> {
        extract_host(input).ok_or_else(|| {
            AppError::bad_request("Invalid domain", json!({ "domain": input }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockBadDomainRepository;
    use chrono::Utc;

    fn entry(domain: &str, reason: Option<String>) -> BadDomain {
        BadDomain {
            domain: domain.to_string(),
            reason,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_add_domain_normalizes_input() {
        let mut repo = MockBadDomainRepository::new();
        repo.expect_add()
            .withf(|d| d.domain == "known-bad.tld" && d.reason.as_deref() == Some("spam"))
            .times(1)
            .returning(|d| Ok(entry(&d.domain, d.reason)));

        let service = BadDomainService::new(Arc::new(repo));

        let created = service
            .add_domain("HTTP://Known-Bad.tld/landing", Some("spam".to_string()))
            .await
            .unwrap();

        assert_eq!(created.domain, "known-bad.tld");
    }

    #[tokio::test]
    async fn test_add_domain_drops_blank_reason() {
        let mut repo = MockBadDomainRepository::new();
        repo.expect_add()
            .withf(|d| d.reason.is_none())
            .times(1)
            .returning(|d| Ok(entry(&d.domain, d.reason)));

        let service = BadDomainService::new(Arc::new(repo));

        assert!(
            service
                .add_domain("known-bad.tld", Some("  ".to_string()))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_add_domain_rejects_empty() {
        let mut repo = MockBadDomainRepository::new();
        repo.expect_add().times(0);

        let service = BadDomainService::new(Arc::new(repo));

        let err = service.add_domain("  ", None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_remove_domain_not_registered() {
        let mut repo = MockBadDomainRepository::new();
        repo.expect_remove()
            .withf(|d| d == "example.com")
            .times(1)
            .returning(|_| Ok(false));

        let service = BadDomainService::new(Arc::new(repo));

        let err = service.remove_domain("Example.com").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_domain_success() {
        let mut repo = MockBadDomainRepository::new();
        repo.expect_remove().times(1).returning(|_| Ok(true));

        let service = BadDomainService::new(Arc::new(repo));

        assert!(service.remove_domain("known-bad.tld").await.is_ok());
    }

    #[tokio::test]
    async fn test_seed_skips_existing_entries() {
        let mut repo = MockBadDomainRepository::new();
        repo.expect_add().times(2).returning(|d| {
            if d.domain == "existing.tld" {
                Err(AppError::conflict("Domain is already registered", json!({})))
            } else {
                Ok(entry(&d.domain, d.reason))
            }
        });

        let service = BadDomainService::new(Arc::new(repo));

        let added = service
            .seed(&["existing.tld".to_string(), "new.tld".to_string()])
            .await
            .unwrap();

        assert_eq!(added, 1);
    }

    #[tokio::test]
    async fn test_seed_stops_on_storage_error() {
        let mut repo = MockBadDomainRepository::new();
        repo.expect_add()
            .times(1)
            .returning(|_| Err(AppError::persistence("Database error", json!({}))));

        let service = BadDomainService::new(Arc::new(repo));

        let err = service
            .seed(&["a.tld".to_string(), "b.tld".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Persistence { .. }));
    }
}
