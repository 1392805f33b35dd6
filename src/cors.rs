//! CORS configuration for the preview API
//!
//! The API is a read-only, credential-free endpoint meant to be embedded in
//! arbitrary frontends, so any origin may call it; only GET and the preflight
//! OPTIONS are accepted.

use http::Method;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// Methods the API accepts.
pub const ALLOWED_METHODS: [Method; 2] = [Method::GET, Method::OPTIONS];

/// Preflight cache lifetime (1 hour).
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

/// CORS layer for the public preview API.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS))
}
