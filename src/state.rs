//! Shared state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::ClickService;
use crate::domain::repositories::ClickRepository;
use crate::domain::reputation::DomainReputation;

/// Click service over type-erased collaborators, as wired by the server.
pub type DynClickService = ClickService<dyn ClickRepository, dyn DomainReputation>;

#[derive(Clone)]
pub struct AppState {
    pub click_service: Arc<DynClickService>,
    /// Read the client IP from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(click_service: Arc<DynClickService>, behind_proxy: bool) -> Self {
        Self {
            click_service,
            behind_proxy,
        }
    }
}
