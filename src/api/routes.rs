//! API route configuration.

use crate::api::handlers::get_click_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// Read-only API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET /clicks/{id}` - Full click record
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/clicks/{id}", get(get_click_handler))
}
