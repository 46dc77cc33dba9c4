#![allow(dead_code)]

use axum::extract::ConnectInfo;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

use click_tracker::application::services::ClickService;
use click_tracker::domain::entities::{ClickAttributes, NewBadDomain};
use click_tracker::domain::repositories::{BadDomainRepository, ClickRepository};
use click_tracker::domain::reputation::DomainReputation;
use click_tracker::infrastructure::persistence::{
    InMemoryBadDomainRepository, InMemoryClickRepository, PgBadDomainRepository,
    PgClickRepository,
};
use click_tracker::infrastructure::reputation::BadDomainRegistry;
use click_tracker::state::{AppState, DynClickService};
use click_tracker::utils::dedup_digest::dedup_digest;

pub const PEER_ADDR: &str = "127.0.0.1:12345";

/// In-memory wiring shared by handler and property tests.
pub struct TestContext {
    pub clicks: Arc<InMemoryClickRepository>,
    pub bad_domains: Arc<InMemoryBadDomainRepository>,
    pub service: Arc<DynClickService>,
}

impl TestContext {
    pub fn new() -> Self {
        let clicks = Arc::new(InMemoryClickRepository::new());
        let bad_domains = Arc::new(InMemoryBadDomainRepository::new());

        let click_repo: Arc<dyn ClickRepository> = clicks.clone();
        let registry: Arc<dyn DomainReputation> =
            Arc::new(BadDomainRegistry::new(bad_domains.clone()));
        let service = Arc::new(ClickService::new(click_repo, registry));

        Self {
            clicks,
            bad_domains,
            service,
        }
    }

    pub fn state(&self, behind_proxy: bool) -> AppState {
        AppState::new(self.service.clone(), behind_proxy)
    }

    pub async fn mark_bad(&self, domain: &str) {
        self.bad_domains
            .add(NewBadDomain {
                domain: domain.to_string(),
                reason: None,
            })
            .await
            .unwrap();
    }

    pub async fn stored_clicks(&self) -> i64 {
        self.clicks.count().await.unwrap()
    }
}

pub fn attributes(
    user_agent: &str,
    user_ip: &str,
    referrer: &str,
    param1: &str,
) -> ClickAttributes {
    ClickAttributes::new(user_agent, user_ip, referrer, param1, "p2")
}

pub async fn create_test_click(pool: &PgPool, id: &str, referrer: &str, param1: &str) {
    let attrs = ClickAttributes::new("Mozilla/5.0", "10.0.0.1", referrer, param1, "p2");

    sqlx::query(
        "INSERT INTO clicks (id, user_agent, user_ip, referrer, param1, param2, dedup_hash) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(id)
    .bind(&attrs.user_agent)
    .bind(&attrs.user_ip)
    .bind(&attrs.referrer)
    .bind(&attrs.param1)
    .bind(&attrs.param2)
    .bind(dedup_digest(&attrs.dedup_key()))
    .execute(pool)
    .await
    .unwrap();
}

/// Click service over PostgreSQL repositories.
pub fn create_pg_service(pool: PgPool) -> (Arc<DynClickService>, Arc<PgClickRepository>) {
    let pool = Arc::new(pool);
    let clicks = Arc::new(PgClickRepository::new(pool.clone()));

    let click_repo: Arc<dyn ClickRepository> = clicks.clone();
    let registry: Arc<dyn DomainReputation> =
        Arc::new(BadDomainRegistry::new(Arc::new(PgBadDomainRepository::new(pool))));

    (Arc::new(ClickService::new(click_repo, registry)), clicks)
}

/// Inserts the `ConnectInfo` extension that `axum::serve` would normally provide.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
