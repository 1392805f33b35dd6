//! Status and health check handlers
//!
//! - `GET /health` - liveness probe for systemd/load balancers
//! - `GET /status` - uptime, extraction counters, latency percentiles
//!
//! `AppState` is also where the extraction service and the rate gate live;
//! one instance is shared across all requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::limiter::RateGate;
use crate::service::ExtractionService;

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name from Cargo.toml
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Response Types
// ============================================================================

/// Health check response for liveness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" if the process is responding
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Detailed server status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server version
    pub version: String,
    /// Server name
    pub name: String,
    /// Seconds since process start
    pub uptime_seconds: u64,
    /// Successful extractions since start
    pub extractions_ok: u64,
    /// Failed extractions since start (validation and fetch failures)
    pub extractions_failed: u64,
    /// Requests rejected by the rate gate
    pub rate_limited: u64,
    /// Pipeline latency percentiles
    pub latency: LatencyMetrics,
    /// Always "running" if responding
    pub status: String,
    /// ISO8601 timestamp of this snapshot
    pub timestamp: String,
}

/// Pipeline latency percentiles in milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatencyMetrics {
    /// Median
    pub p50_ms: f64,
    /// 95th percentile
    pub p95_ms: f64,
    /// 99th percentile
    pub p99_ms: f64,
    /// Samples recorded
    pub total_requests: u64,
}

// ============================================================================
// Latency Histogram
// ============================================================================

/// Thread-safe latency histogram, 1 us to 60 s at 3 significant figures.
#[derive(Debug)]
pub struct LatencyHistogram {
    inner: RwLock<Histogram<u64>>,
}

impl LatencyHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        let histogram =
            Histogram::new_with_bounds(1, 60_000_000, 3).expect("failed to create histogram");
        Self {
            inner: RwLock::new(histogram),
        }
    }

    /// Record one pipeline duration. Out-of-bounds values are ignored.
    pub fn record(&self, duration: Duration) {
        let _ = self.inner.write().record(duration.as_micros() as u64);
    }

    /// Snapshot the percentiles in milliseconds.
    pub fn metrics(&self) -> LatencyMetrics {
        let hist = self.inner.read();
        LatencyMetrics {
            p50_ms: hist.value_at_percentile(50.0) as f64 / 1000.0,
            p95_ms: hist.value_at_percentile(95.0) as f64 / 1000.0,
            p99_ms: hist.value_at_percentile(99.0) as f64 / 1000.0,
            total_requests: hist.len(),
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state: the pipeline, the rate gate, and counters.
///
/// Counters are atomics and the histogram is behind an RwLock, so one `Arc`
/// of this is freely shared across all request tasks.
pub struct AppState {
    service: ExtractionService,
    gate: Arc<dyn RateGate>,
    start_time: Instant,
    extractions_ok: AtomicU64,
    extractions_failed: AtomicU64,
    rate_limited: AtomicU64,
    latency: LatencyHistogram,
}

impl AppState {
    /// Create the shared state around a pipeline and a rate gate.
    pub fn new(service: ExtractionService, gate: Arc<dyn RateGate>) -> Self {
        Self {
            service,
            gate,
            start_time: Instant::now(),
            extractions_ok: AtomicU64::new(0),
            extractions_failed: AtomicU64::new(0),
            rate_limited: AtomicU64::new(0),
            latency: LatencyHistogram::new(),
        }
    }

    /// The extraction pipeline.
    pub fn service(&self) -> &ExtractionService {
        &self.service
    }

    /// The injected rate gate.
    pub fn gate(&self) -> &dyn RateGate {
        self.gate.as_ref()
    }

    /// Seconds since process start.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Record a completed extraction.
    pub fn record_success(&self, elapsed: Duration) {
        self.extractions_ok.fetch_add(1, Ordering::Relaxed);
        self.latency.record(elapsed);
    }

    /// Record a failed extraction.
    pub fn record_failure(&self, elapsed: Duration) {
        self.extractions_failed.fetch_add(1, Ordering::Relaxed);
        self.latency.record(elapsed);
    }

    /// Record a request rejected by the rate gate.
    pub fn record_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    /// Successful extraction count.
    pub fn extractions_ok(&self) -> u64 {
        self.extractions_ok.load(Ordering::Relaxed)
    }

    /// Failed extraction count.
    pub fn extractions_failed(&self) -> u64 {
        self.extractions_failed.load(Ordering::Relaxed)
    }

    /// Rate-limited request count.
    pub fn rate_limited(&self) -> u64 {
        self.rate_limited.load(Ordering::Relaxed)
    }

    /// Latency percentile snapshot.
    pub fn latency_metrics(&self) -> LatencyMetrics {
        self.latency.metrics()
    }
}

// ============================================================================
// HTTP Handlers
// ============================================================================

/// `GET /health`
#[instrument(skip_all)]
pub async fn health_handler() -> impl IntoResponse {
    debug!("health check requested");
    (StatusCode::OK, Json(HealthResponse::default()))
}

/// `GET /status`
#[instrument(skip_all)]
pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("status requested");

    let response = StatusResponse {
        version: SERVER_VERSION.to_string(),
        name: SERVER_NAME.to_string(),
        uptime_seconds: state.uptime_seconds(),
        extractions_ok: state.extractions_ok(),
        extractions_failed: state.extractions_failed(),
        rate_limited: state.rate_limited(),
        latency: state.latency_metrics(),
        status: "running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(response))
}

// ============================================================================
// Tests
// ============================================================================
