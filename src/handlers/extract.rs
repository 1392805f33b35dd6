//! Preview extraction endpoint
//!
//! `GET /api/extract?url=<raw>` - the one user-facing operation. The rate
//! gate is evaluated first, then the parameter check, then the pipeline;
//! every failure is mapped to its status code and human-readable message in
//! one place via the error taxonomy.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::Error;
use crate::handlers::AppState;

/// Query parameters for `GET /api/extract`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractParams {
    /// Raw user-supplied URL; all validation happens in the pipeline
    pub url: Option<String>,
}

/// JSON body shared by all failure responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message for the caller
    pub error: String,
}

/// Handle one extraction request.
#[instrument(skip_all, fields(client = %addr.ip()))]
pub async fn extract_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Query(params): Query<ExtractParams>,
) -> Response {
    if !state.gate().check(addr.ip()).is_allowed() {
        warn!(client = %addr.ip(), "rate limit exceeded");
        state.record_rate_limited();
        return error_response(&Error::RateLimited);
    }

    let Some(raw_url) = params.url else {
        return error_response(&Error::MissingParameter);
    };

    let started = Instant::now();
    match state.service().extract_from_url(&raw_url).await {
        Ok(metadata) => {
            state.record_success(started.elapsed());
            (StatusCode::OK, Json(metadata)).into_response()
        }
        Err(err) => {
            debug!(error = %err, "extraction failed");
            state.record_failure(started.elapsed());
            error_response(&err)
        }
    }
}

fn error_response(err: &Error) -> Response {
    (
        err.status_code(),
        Json(ErrorResponse {
            error: err.user_message(),
        }),
    )
        .into_response()
}
