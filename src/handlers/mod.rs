//! HTTP handlers
//!
//! Axum routes for the preview API plus health/status probes. The router is
//! built here so the binary and the integration tests share one wiring.

pub mod extract;
pub mod status;

pub use extract::{extract_handler, ErrorResponse, ExtractParams};
pub use status::{
    health_handler, status_handler, AppState, HealthResponse, LatencyMetrics, StatusResponse,
};

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

/// Build the API router over shared state.
///
/// Routes:
/// - `GET /api/extract` - the extraction pipeline
/// - `GET /health` - liveness probe
/// - `GET /status` - counters and latency percentiles
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/extract", get(extract_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .layer(crate::cors::cors_layer())
        .with_state(state)
}
