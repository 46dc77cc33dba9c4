//! In-process click store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{Click, DedupKey, NewClick};
use crate::domain::repositories::{ClickRepository, InsertOutcome};
use crate::error::AppError;

#[derive(Default)]
struct Store {
    by_id: HashMap<String, Click>,
    id_by_key: HashMap<DedupKey, String>,
}

/// A click store kept in process memory.
///
/// Both uniqueness constraints are checked and applied under a single write
/// lock, so it settles concurrent inserts the same way the PostgreSQL store
/// does.
///
/// # Use Cases
///
/// - Development without a database (`STORAGE_BACKEND=memory`)
/// - Integration tests of the ingestion flow
#[derive(Default)]
pub struct InMemoryClickRepository {
    store: RwLock<Store>,
}

impl InMemoryClickRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn find_by_dedup_key(&self, key: &DedupKey) -> Result<Option<Click>, AppError> {
        let store = self.store.read().await;

        Ok(store
            .id_by_key
            .get(key)
            .and_then(|id| store.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Click>, AppError> {
        Ok(self.store.read().await.by_id.get(id).cloned())
    }

    async fn insert(&self, new_click: NewClick) -> Result<InsertOutcome, AppError> {
        let mut store = self.store.write().await;

        if store.by_id.contains_key(&new_click.id) {
            return Ok(InsertOutcome::DuplicateId);
        }

        let key = new_click.dedup_key();
        if store.id_by_key.contains_key(&key) {
            return Ok(InsertOutcome::DuplicateKey);
        }

        let click = new_click.into_click(Utc::now());
        store.id_by_key.insert(key, click.id.clone());
        store.by_id.insert(click.id.clone(), click.clone());

        Ok(InsertOutcome::Inserted(click))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.store.read().await.by_id.len() as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
