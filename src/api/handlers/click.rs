//! Handlers for click ingestion and lookup.

use axum::{
    Json,
    extract::{ConnectInfo, Path, Query, State, rejection::QueryRejection},
    http::{HeaderMap, StatusCode, header},
};
use std::net::SocketAddr;

use crate::api::dto::click::{ClickResponse, IngestQuery, IngestResponse};
use crate::domain::entities::ClickAttributes;
use crate::domain::ingest_outcome::IngestOutcome;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::{extract_client_ip, header_or_empty};

/// Records a click for the requesting client.
///
/// # Endpoint
///
/// `GET /click?param1={param1}&param2={param2}`
///
/// # Request Flow
///
/// 1. Read `User-Agent` and `Referer` headers and the client IP
/// 2. Ingest the click (deduplicated by user agent, IP, referrer and `param1`)
/// 3. Answer according to the outcome
///
/// # Response Codes
///
/// - **201 Created**: a new click was recorded
/// - **200 OK**: the click had already been recorded; the stored one is returned
/// - **400 Bad Request**: a header or parameter is missing, empty or malformed
/// - **503 Service Unavailable**: the store failed
///
/// # Response
///
/// ```json
/// {
///   "click_id": "0193f1c2a4b5e6f708192a3b4c5d6e7f",
///   "existing": false,
///   "is_bad_domain": false,
///   "has_error": false
/// }
/// ```
pub async fn ingest_click_handler(
    State(state): State<AppState>,
    query: Result<Query<IngestQuery>, QueryRejection>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<(StatusCode, Json<IngestResponse>), AppError> {
    let Query(query) = query?;

    let attributes = ClickAttributes {
        user_agent: header_or_empty(&headers, header::USER_AGENT),
        user_ip: extract_client_ip(&headers, addr, state.behind_proxy),
        referrer: header_or_empty(&headers, header::REFERER),
        param1: query.param1,
        param2: query.param2,
    };

    let outcome = state.click_service.ingest(attributes).await?;

    let status = match outcome {
        IngestOutcome::Created(_) => StatusCode::CREATED,
        IngestOutcome::Existing(_) => StatusCode::OK,
    };

    Ok((status, Json(IngestResponse::from(&outcome))))
}

/// Returns a stored click.
///
/// # Endpoint
///
/// `GET /api/clicks/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if no click has this id.
pub async fn get_click_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClickResponse>, AppError> {
    let click = state.click_service.get_click(&id).await?;
    Ok(Json(click.into()))
}
