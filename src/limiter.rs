//! Request rate limiting
//!
//! The extraction endpoint is gated by a pluggable rate limiter, constructed
//! once at process start and injected into the HTTP layer. The default
//! implementation keeps a sliding window of request timestamps per client,
//! pruned opportunistically on each check and swept periodically by a
//! background task so idle clients do not accumulate.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

/// Default allowed requests per client per window.
pub const DEFAULT_MAX_REQUESTS: usize = 30;

/// Rolling window length.
pub const WINDOW: Duration = Duration::from_secs(60);

/// How often the background sweep drops idle clients.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Decision returned by a rate gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request may proceed
    Allowed,
    /// Client exceeded its window
    Denied,
}

impl RateDecision {
    /// Whether the request may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }
}

/// A pluggable request gate keyed by client identity.
///
/// Evaluated before the extraction pipeline runs. Implementations must be
/// cheap and must not block; the pipeline itself never touches limiter state,
/// so a distributed implementation can be swapped in without changing it.
pub trait RateGate: Send + Sync {
    /// Record one request from `client` and decide whether it may proceed.
    fn check(&self, client: IpAddr) -> RateDecision;
}

/// Sliding-window limiter over per-client request timestamps.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    windows: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl SlidingWindowLimiter {
    /// Create a limiter allowing `max_requests` per client per rolling
    /// 60-second window.
    pub fn new(max_requests: usize) -> Self {
        Self::with_window(max_requests, WINDOW)
    }

    /// Create a limiter with a custom window length.
    pub fn with_window(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Drop clients whose most recent request has left the window.
    pub fn sweep(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        let before = windows.len();
        windows.retain(|_, stamps| {
            stamps.retain(|t| now.duration_since(*t) < self.window);
            !stamps.is_empty()
        });
        debug!(dropped = before - windows.len(), "rate limiter sweep");
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }

    /// Spawn the periodic sweep task for a shared limiter.
    ///
    /// The task runs for the life of the process; the handle is returned for
    /// callers that want to abort it in tests.
    pub fn spawn_sweeper(limiter: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                limiter.sweep();
            }
        })
    }
}

impl RateGate for SlidingWindowLimiter {
    fn check(&self, client: IpAddr) -> RateDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock();
        let stamps = windows.entry(client).or_default();

        stamps.retain(|t| now.duration_since(*t) < self.window);

        if stamps.len() >= self.max_requests {
            return RateDecision::Denied;
        }
        stamps.push(now);
        RateDecision::Allowed
    }
}
