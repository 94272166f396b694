//! API Handlers
//!
//! The gateway plays host to the worker: each `/fetch` call is delivered as a
//! fetch event and `/activate` as an activate event.

use axum::{
    extract::{Query, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::cache::{CacheStorage, CacheStore};
use crate::error::{Result, WorkerError};
use crate::models::{ActivateResponse, FetchQuery, HealthResponse, StatsResponse};
use crate::worker::ImageCacheWorker;

/// Header telling the client whether the image came from cache.
pub const CACHE_STATUS_HEADER: &str = "x-image-cache";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub worker: ImageCacheWorker,
}

impl AppState {
    pub fn new(worker: ImageCacheWorker) -> Self {
        Self { worker }
    }
}

/// Handler for GET /fetch
///
/// Image requests are answered by the worker and tagged with
/// `x-image-cache: hit | miss | stale`. Anything else is fetched directly,
/// the way a browser would without a worker installed.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> Result<Response> {
    if let Some(error_msg) = query.validate() {
        return Err(WorkerError::InvalidRequest(error_msg));
    }
    let request = query.to_request()?;

    match state.worker.intercept(request.clone()) {
        Some(pending) => {
            let served = pending.await?;
            let mut response = served.response.into_response();
            response.headers_mut().insert(
                HeaderName::from_static(CACHE_STATUS_HEADER),
                HeaderValue::from_static(served.source.as_str()),
            );
            Ok(response)
        }
        None => {
            debug!(url = %request.url, "passing request through to network");
            let response = state.worker.network().fetch(&request).await?;
            Ok(response.into_response())
        }
    }
}

/// Handler for POST /activate
///
/// Responds once every outdated generation has been dealt with.
pub async fn activate_handler(State(state): State<AppState>) -> Json<ActivateResponse> {
    let deleted = state.worker.activate().await;
    Json(ActivateResponse::new(
        state.worker.config().current_cache_name(),
        deleted,
    ))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let config = state.worker.config();
    let cache_name = config.current_cache_name();
    let cache = state.worker.storage().open(&cache_name).await?;
    let entries = cache.keys().await?.len();

    Ok(Json(StatsResponse::new(
        cache_name,
        entries,
        config.max_entries,
        state.worker.stats(),
    )))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
