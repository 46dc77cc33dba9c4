//! PostgreSQL implementation of the bad domain registry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{BadDomain, NewBadDomain};
use crate::domain::repositories::BadDomainRepository;
use crate::error::AppError;
use crate::utils::db_error::unique_violation_constraint;

#[derive(sqlx::FromRow)]
struct BadDomainRow {
    domain: String,
    reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BadDomainRow> for BadDomain {
    fn from(r: BadDomainRow) -> Self {
        BadDomain {
            domain: r.domain,
            reason: r.reason,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL repository for registered bad domains.
pub struct PgBadDomainRepository {
    pool: Arc<PgPool>,
}

impl PgBadDomainRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BadDomainRepository for PgBadDomainRepository {
    async fn add(&self, new_domain: NewBadDomain) -> Result<BadDomain, AppError> {
        let result = sqlx::query_as::<_, BadDomainRow>(
            r#"
            INSERT INTO bad_domains (domain, reason)
            VALUES ($1, $2)
            RETURNING domain, reason, created_at
            "#,
        )
        .bind(&new_domain.domain)
        .bind(&new_domain.reason)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if unique_violation_constraint(&e).is_some() => Err(AppError::conflict(
                "Domain is already registered",
                json!({ "domain": new_domain.domain }),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, domain: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM bad_domains WHERE domain = $1")
            .bind(domain)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<BadDomain>, AppError> {
        let rows = sqlx::query_as::<_, BadDomainRow>(
            "SELECT domain, reason, created_at FROM bad_domains ORDER BY domain",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(BadDomain::from).collect())
    }

    async fn contains_any(&self, domains: &[String]) -> Result<bool, AppError> {
        if domains.is_empty() {
            return Ok(false);
        }

        let found: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bad_domains WHERE domain = ANY($1))")
                .bind(domains)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(found)
    }
}
