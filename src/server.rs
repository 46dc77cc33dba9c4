//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, registry seeding, and the Axum server lifecycle.

use crate::application::services::{BadDomainService, ClickService};
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{BadDomainRepository, ClickRepository};
use crate::domain::reputation::DomainReputation;
use crate::infrastructure::persistence::{
    InMemoryBadDomainRepository, InMemoryClickRepository, PgBadDomainRepository,
    PgClickRepository,
};
use crate::infrastructure::reputation::BadDomainRegistry;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Repositories selected by [`Config::storage_backend`].
pub struct Repositories {
    pub clicks: Arc<dyn ClickRepository>,
    pub bad_domains: Arc<dyn BadDomainRepository>,
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Click and bad domain repositories (PostgreSQL with migrations, or in-memory)
/// - The bad domain registry seed from `BAD_DOMAINS`
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - A seed domain is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repositories = build_repositories(&config).await?;

    let bad_domain_service = BadDomainService::new(repositories.bad_domains.clone());
    let seeded = bad_domain_service
        .seed(&config.bad_domains)
        .await
        .context("Failed to seed bad domain registry")?;
    if seeded > 0 {
        tracing::info!("Registered {} bad domains from BAD_DOMAINS", seeded);
    }

    let reputation: Arc<dyn DomainReputation> =
        Arc::new(BadDomainRegistry::new(repositories.bad_domains));
    let click_service = Arc::new(ClickService::new(repositories.clicks, reputation));

    let state = AppState::new(click_service, config.behind_proxy);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the repositories for the configured storage backend.
///
/// # Errors
///
/// Returns an error if the database is unreachable or migrations fail.
pub async fn build_repositories(config: &Config) -> Result<Repositories> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, clicks are lost on restart");
            Ok(Repositories {
                clicks: Arc::new(InMemoryClickRepository::new()),
                bad_domains: Arc::new(InMemoryBadDomainRepository::new()),
            })
        }
        StorageBackend::Postgres => {
            let pool = Arc::new(connect_database(config).await?);
            Ok(Repositories {
                clicks: Arc::new(PgClickRepository::new(pool.clone())),
                bad_domains: Arc::new(PgBadDomainRepository::new(pool)),
            })
        }
    }
}

/// Connects to PostgreSQL and applies pending migrations.
async fn connect_database(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres storage backend")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
