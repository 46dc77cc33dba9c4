//! Click ingestion and retrieval service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Click, ClickAttributes, DedupKey, NewClick};
use crate::domain::ingest_outcome::IngestOutcome;
use crate::domain::repositories::{ClickRepository, InsertOutcome};
use crate::domain::reputation::DomainReputation;
use crate::error::AppError;
use crate::utils::click_id::{generate_click_id, is_valid_click_id};

/// Upper bound on insert attempts when a generated id collides.
pub const MAX_INSERT_ATTEMPTS: usize = 3;

/// Service that ingests clicks with natural-key deduplication.
///
/// The repository is the only shared state. Races between concurrent calls
/// with the same dedup key are settled by the store's uniqueness constraint:
/// the loser re-reads the winner's click and reports it as existing.
pub struct ClickService<R: ClickRepository + ?Sized, D: DomainReputation + ?Sized> {
    click_repository: Arc<R>,
    reputation: Arc<D>,
}

impl<R: ClickRepository + ?Sized, D: DomainReputation + ?Sized> ClickService<R, D> {
    /// Creates a new click service.
    pub fn new(click_repository: Arc<R>, reputation: Arc<D>) -> Self {
        Self {
            click_repository,
            reputation,
        }
    }

    /// Records a click, or returns the click already stored for its dedup key.
    ///
    /// # Deduplication
    ///
    /// The key is `(user_agent, user_ip, referrer, param1)`, compared
    /// byte-exactly. A matching click is returned unchanged; its `param2` is
    /// never updated. The found path performs no writes.
    ///
    /// # Creation
    ///
    /// A new click gets a fresh 128-bit id and its `is_bad_domain` flag from
    /// the reputation check. If that check fails, the click is still stored,
    /// with `is_bad_domain = false` and `has_error = true`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if any attribute is empty; nothing is
    /// stored.
    ///
    /// Returns [`AppError::Persistence`] if the store fails, or if
    /// [`MAX_INSERT_ATTEMPTS`] generated ids all collided.
    pub async fn ingest(&self, attributes: ClickAttributes) -> Result<IngestOutcome, AppError> {
        attributes.validate()?;

        let key = attributes.dedup_key();
        if let Some(existing) = self.click_repository.find_by_dedup_key(&key).await? {
            debug!(click_id = %existing.id, "Click already recorded");
            return Ok(IngestOutcome::Existing(existing));
        }

        let (is_bad_domain, has_error) = self.assess_referrer(&attributes.referrer).await;

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let new_click = NewClick {
                id: generate_click_id()?,
                attributes: attributes.clone(),
                is_bad_domain,
                has_error,
            };

            match self.click_repository.insert(new_click).await? {
                InsertOutcome::Inserted(click) => {
                    info!(
                        click_id = %click.id,
                        is_bad_domain = click.is_bad_domain,
                        has_error = click.has_error,
                        "Click recorded"
                    );
                    return Ok(IngestOutcome::Created(click));
                }
                InsertOutcome::DuplicateId => {
                    warn!(attempt, "Generated click id already exists, regenerating");
                }
                InsertOutcome::DuplicateKey => return self.resolve_lost_race(&key).await,
            }
        }

        Err(AppError::persistence(
            "Failed to allocate a unique click id",
            json!({ "attempts": MAX_INSERT_ATTEMPTS }),
        ))
    }

    /// Retrieves a click by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no click has this id.
    /// Returns [`AppError::Persistence`] on storage errors.
    pub async fn get_click(&self, id: &str) -> Result<Click, AppError> {
        let not_found = || AppError::not_found("Click not found", json!({ "id": id }));

        if !is_valid_click_id(id) {
            return Err(not_found());
        }

        self.click_repository
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)
    }

    /// Counts stored clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage errors.
    pub async fn count_clicks(&self) -> Result<i64, AppError> {
        self.click_repository.count().await
    }

    /// Checks if the click store is reachable.
    pub async fn health_check(&self) -> bool {
        self.click_repository.health_check().await
    }

    /// Returns `(is_bad_domain, has_error)` for a new click's referrer.
    async fn assess_referrer(&self, referrer: &str) -> (bool, bool) {
        match self.reputation.is_bad_domain(referrer).await {
            Ok(is_bad) => (is_bad, false),
            Err(e) => {
                warn!(error = %e, referrer, "Reputation check failed, click flagged with error");
                (false, true)
            }
        }
    }

    /// Another call stored a click with this key between our lookup and
    /// insert; return that click as existing.
    async fn resolve_lost_race(&self, key: &DedupKey) -> Result<IngestOutcome, AppError> {
        match self.click_repository.find_by_dedup_key(key).await? {
            Some(winner) => {
                debug!(click_id = %winner.id, "Concurrent ingest stored this click first");
                Ok(IngestOutcome::Existing(winner))
            }
            None => Err(AppError::persistence(
                "Dedup key reported as taken but no click was found",
                json!({}),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reputation::MockDomainReputation;
    use crate::domain::repositories::MockClickRepository;
    use chrono::Utc;
    use mockall::Sequence;
    use std::sync::Mutex;

    fn attributes() -> ClickAttributes {
        ClickAttributes::new(
            "UA1",
            "1.2.3.4",
            "http://example.com",
            "campaign=1",
            "sub=9",
        )
    }

    fn stored_click(id: &str, param2: &str) -> Click {
        Click {
            id: id.to_string(),
            user_agent: "UA1".to_string(),
            user_ip: "1.2.3.4".to_string(),
            referrer: "http://example.com".to_string(),
            param1: "campaign=1".to_string(),
            param2: param2.to_string(),
            is_bad_domain: false,
            has_error: false,
            created_at: Utc::now(),
        }
    }

    fn clean_reputation() -> MockDomainReputation {
        let mut reputation = MockDomainReputation::new();
        reputation.expect_is_bad_domain().returning(|_| Ok(false));
        reputation
    }

    fn service(
        repo: MockClickRepository,
        reputation: MockDomainReputation,
    ) -> ClickService<MockClickRepository, MockDomainReputation> {
        ClickService::new(Arc::new(repo), Arc::new(reputation))
    }

    #[tokio::test]
    async fn test_ingest_creates_new_click() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_dedup_key()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|c| c.attributes.param2 == "sub=9" && is_valid_click_id(&c.id))
            .times(1)
            .returning(|c| Ok(InsertOutcome::Inserted(c.into_click(Utc::now()))));

        let result = service(repo, clean_reputation()).ingest(attributes()).await;

        let outcome = result.unwrap();
        assert!(!outcome.was_existing());
        assert!(is_valid_click_id(outcome.id()));
        assert!(!outcome.click().is_bad_domain);
        assert!(!outcome.click().has_error);
    }

    #[tokio::test]
    async fn test_ingest_returns_existing_without_writing() {
        let mut repo = MockClickRepository::new();
        let existing = stored_click("abc123", "sub=9");
        repo.expect_find_by_dedup_key()
            .withf(|key| key.param1 == "campaign=1" && key.referrer == "http://example.com")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_insert().times(0);

        let mut reputation = MockDomainReputation::new();
        reputation.expect_is_bad_domain().times(0);

        let mut attrs = attributes();
        attrs.param2 = "sub=10".to_string();

        let outcome = service(repo, reputation).ingest(attrs).await.unwrap();

        assert!(outcome.was_existing());
        assert_eq!(outcome.id(), "abc123");
        assert_eq!(outcome.click().param2, "sub=9");
    }

    #[tokio::test]
    async fn test_ingest_validation_error_touches_nothing() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_dedup_key().times(0);
        repo.expect_insert().times(0);

        let mut reputation = MockDomainReputation::new();
        reputation.expect_is_bad_domain().times(0);

        let attrs = ClickAttributes::new("UA1", "", "http://example.com", "", "sub=9");
        let err = service(repo, reputation).ingest(attrs).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(
            err.details()["missing_fields"],
            json!(["user_ip", "param1"])
        );
    }

    #[tokio::test]
    async fn test_ingest_flags_bad_domain() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_dedup_key().returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|c| c.is_bad_domain && !c.has_error)
            .times(1)
            .returning(|c| Ok(InsertOutcome::Inserted(c.into_click(Utc::now()))));

        let mut reputation = MockDomainReputation::new();
        reputation
            .expect_is_bad_domain()
            .withf(|referrer| referrer == "http://known-bad.tld")
            .times(1)
            .returning(|_| Ok(true));

        let mut attrs = attributes();
        attrs.referrer = "http://known-bad.tld".to_string();

        let outcome = service(repo, reputation).ingest(attrs).await.unwrap();
        assert!(outcome.click().is_bad_domain);
    }

    #[tokio::test]
    async fn test_ingest_reputation_failure_sets_has_error() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_dedup_key().returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|c| !c.is_bad_domain && c.has_error)
            .times(1)
            .returning(|c| Ok(InsertOutcome::Inserted(c.into_click(Utc::now()))));

        let mut reputation = MockDomainReputation::new();
        reputation
            .expect_is_bad_domain()
            .times(1)
            .returning(|_| Err(AppError::persistence("Database error", json!({}))));

        let outcome = service(repo, reputation).ingest(attributes()).await.unwrap();

        assert!(!outcome.was_existing());
        assert!(outcome.click().has_error);
    }

    #[tokio::test]
    async fn test_ingest_retries_on_id_collision_with_fresh_id() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_dedup_key().returning(|_| Ok(None));

        let seen_ids = Arc::new(Mutex::new(Vec::new()));
        let mut seq = Sequence::new();

        let first_ids = seen_ids.clone();
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |c| {
                first_ids.lock().unwrap().push(c.id.clone());
                Ok(InsertOutcome::DuplicateId)
            });

        let second_ids = seen_ids.clone();
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |c| {
                second_ids.lock().unwrap().push(c.id.clone());
                Ok(InsertOutcome::Inserted(c.into_click(Utc::now())))
            });

        let outcome = service(repo, clean_reputation())
            .ingest(attributes())
            .await
            .unwrap();

        let ids = seen_ids.lock().unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(outcome.id(), ids[1]);
    }

    #[tokio::test]
    async fn test_ingest_escalates_after_bounded_collisions() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_dedup_key().returning(|_| Ok(None));
        repo.expect_insert()
            .times(MAX_INSERT_ATTEMPTS)
            .returning(|_| Ok(InsertOutcome::DuplicateId));

        let err = service(repo, clean_reputation())
            .ingest(attributes())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Persistence { .. }));
        assert_eq!(err.details()["attempts"], json!(MAX_INSERT_ATTEMPTS));
    }

    #[tokio::test]
    async fn test_ingest_lost_race_returns_winner_as_existing() {
        let mut repo = MockClickRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_dedup_key()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(InsertOutcome::DuplicateKey));

        let winner = stored_click("winner", "sub=1");
        repo.expect_find_by_dedup_key()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(winner.clone())));

        let outcome = service(repo, clean_reputation())
            .ingest(attributes())
            .await
            .unwrap();

        assert!(outcome.was_existing());
        assert_eq!(outcome.id(), "winner");
        assert_eq!(outcome.click().param2, "sub=1");
    }

    #[tokio::test]
    async fn test_ingest_lost_race_without_winner_is_persistence_error() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_dedup_key()
            .times(2)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|_| Ok(InsertOutcome::DuplicateKey));

        let err = service(repo, clean_reputation())
            .ingest(attributes())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Persistence { .. }));
    }

    #[tokio::test]
    async fn test_ingest_propagates_lookup_failure() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_dedup_key()
            .times(1)
            .returning(|_| Err(AppError::persistence("Database error", json!({}))));
        repo.expect_insert().times(0);

        let err = service(repo, clean_reputation())
            .ingest(attributes())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Persistence { .. }));
    }

    #[tokio::test]
    async fn test_ingest_propagates_insert_failure() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_dedup_key().returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(AppError::persistence("Database error", json!({}))));

        let err = service(repo, clean_reputation())
            .ingest(attributes())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Persistence { .. }));
    }

    #[tokio::test]
    async fn test_get_click_found() {
        let id = generate_click_id().unwrap();
        let click = stored_click(&id, "sub=9");

        let mut repo = MockClickRepository::new();
        let expected = id.clone();
        repo.expect_find_by_id()
            .withf(move |candidate| candidate == expected)
            .times(1)
            .returning(move |_| Ok(Some(click.clone())));

        let result = service(repo, MockDomainReputation::new())
            .get_click(&id)
            .await;

        assert_eq!(result.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_get_click_not_found() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let id = generate_click_id().unwrap();
        let err = service(repo, MockDomainReputation::new())
            .get_click(&id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_click_malformed_id_skips_lookup() {
        let mut repo = MockClickRepository::new();
        repo.expect_find_by_id().times(0);

        let err = service(repo, MockDomainReputation::new())
            .get_click("not-an-id")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
