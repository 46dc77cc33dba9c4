//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Click, DedupKey, NewClick};
use crate::domain::repositories::{ClickRepository, InsertOutcome};
use crate::error::AppError;
use crate::utils::db_error::unique_violation_constraint;
use crate::utils::dedup_digest::dedup_digest;

/// Primary key constraint on `clicks.id`.
pub const ID_CONSTRAINT: &str = "clicks_pkey";
/// Unique constraint on the digest of `(user_agent, user_ip, referrer, param1)`.
pub const DEDUP_KEY_CONSTRAINT: &str = "clicks_dedup_key";

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: String,
    user_agent: String,
    user_ip: String,
    referrer: String,
    param1: String,
    param2: String,
    is_bad_domain: bool,
    has_error: bool,
    created_at: DateTime<Utc>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click {
            id: r.id,
            user_agent: r.user_agent,
            user_ip: r.user_ip,
            referrer: r.referrer,
            param1: r.param1,
            param2: r.param2,
            is_bad_domain: r.is_bad_domain,
            has_error: r.has_error,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for click storage.
///
/// Relies on the `clicks_pkey` and `clicks_dedup_key` constraints to settle
/// concurrent inserts; no application-level locking is done.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn find_by_dedup_key(&self, key: &DedupKey) -> Result<Option<Click>, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, user_agent, user_ip, referrer, param1, param2,
                   is_bad_domain, has_error, created_at
            FROM clicks
            WHERE dedup_hash = $1
              AND user_agent = $2 AND user_ip = $3 AND referrer = $4 AND param1 = $5
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(dedup_digest(key))
        .bind(&key.user_agent)
        .bind(&key.user_ip)
        .bind(&key.referrer)
        .bind(&key.param1)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Click::from))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Click>, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, user_agent, user_ip, referrer, param1, param2,
                   is_bad_domain, has_error, created_at
            FROM clicks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Click::from))
    }

    async fn insert(&self, new_click: NewClick) -> Result<InsertOutcome, AppError> {
        let result = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (id, user_agent, user_ip, referrer, param1, param2,
                                dedup_hash, is_bad_domain, has_error)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_agent, user_ip, referrer, param1, param2,
                      is_bad_domain, has_error, created_at
            "#,
        )
        .bind(&new_click.id)
        .bind(&new_click.attributes.user_agent)
        .bind(&new_click.attributes.user_ip)
        .bind(&new_click.attributes.referrer)
        .bind(&new_click.attributes.param1)
        .bind(&new_click.attributes.param2)
        .bind(dedup_digest(&new_click.dedup_key()))
        .bind(new_click.is_bad_domain)
        .bind(new_click.has_error)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(InsertOutcome::Inserted(row.into())),
            Err(e) => match unique_violation_constraint(&e).as_deref() {
                Some(ID_CONSTRAINT) => Ok(InsertOutcome::DuplicateId),
                Some(DEDUP_KEY_CONSTRAINT) => Ok(InsertOutcome::DuplicateKey),
                _ => {
                    tracing::error!(error = %e, "Failed to insert click");
                    Err(AppError::persistence(
                        "Database error",
                        json!({ "reason": e.to_string() }),
                    ))
                }
            },
        }
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
