//! HTTP API over the station store.
//!
//! Thin collaborator layer: two JSON endpoints over the cached dataset and
//! aggregate tables, plus a health check. All the statistics logic lives in
//! the readers/processors/analyzers modules.

use crate::analyzers::{run_summary, SummaryRequest};
use crate::error::{Result, StatsError};
use crate::models::{DailySeries, TableSlice};
use crate::store::StationStore;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StationStore>,
}

/// Raw query params for the summary endpoint. Kept as strings so malformed
/// years reach the lenient normalization instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub metric: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

fn service_unavailable(err: StatsError) -> (StatusCode, String) {
    (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
}

/// GET /api/weather - full daily series, ISO dates, temps in 0.1 °F
async fn get_weather(
    State(state): State<AppState>,
) -> std::result::Result<Json<DailySeries>, (StatusCode, String)> {
    let dataset = state.store.dataset().await.map_err(service_unavailable)?;
    Ok(Json(dataset.daily_series()))
}

/// GET /api/summary?metric&start&end - one metric table over a year window
async fn get_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> std::result::Result<Json<TableSlice>, (StatusCode, String)> {
    let aggregates = state.store.aggregates().await.map_err(service_unavailable)?;
    let request = SummaryRequest::from_params(
        params.metric.as_deref(),
        params.start.as_deref(),
        params.end.as_deref(),
    );
    Ok(Json(run_summary(&aggregates, &request)))
}

/// GET /health - liveness check, does not touch the dataset
async fn health_check() -> &'static str {
    "ok"
}

/// Create the HTTP router
pub fn create_router(store: Arc<StationStore>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/weather", get(get_weather))
        .route("/api/summary", get(get_summary))
        .with_state(AppState { store })
}

/// Bind and run the HTTP server until shutdown.
pub async fn run_server(store: Arc<StationStore>, host: &str, port: u16) -> Result<()> {
    let app = create_router(store);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("HTTP server listening on {}:{}", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}
