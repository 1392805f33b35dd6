//! LinkLens - Social Link Preview Metadata Service
//!
//! This crate fetches a remote web page under strict resource bounds and
//! extracts its social-preview metadata (Open Graph/Twitter Card tags,
//! favicon, theme color) into one normalized record, served over a small
//! HTTP API.
//!
//! # Features
//!
//! - **SSRF guard**: scheme and private-address validation before any
//!   network traffic, re-applied to every redirect hop
//! - **Bounded fetch**: 10 s wall-clock deadline, HTML content-type gate,
//!   2 MiB body cap with best-effort partial extraction
//! - **Tag-priority extraction**: declarative per-field source tables with
//!   first-match-wins lookup and base-URL resolution
//! - **Stable error taxonomy**: every failure maps to one status code and
//!   one human-readable message
//!
//! # Architecture
//!
//! ```text
//! Client ──▶ Rate Gate ──▶ Extraction Service
//!                               │
//!                ┌──────────────┼──────────────┐
//!                ▼              ▼              ▼
//!           Validator        Fetcher       Extractor
//!           scheme/SSRF    bounded GET    tag priority
//!                                         + resolution
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use linklens::service::ExtractionService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ExtractionService::new();
//!     let metadata = service.extract_from_url("https://example.com").await?;
//!
//!     println!("{} - {}", metadata.title, metadata.domain);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cors;
pub mod error;
pub mod extraction;
pub mod fetcher;
pub mod handlers;
pub mod limiter;
pub mod service;
pub mod validator;

// Re-exports for convenience
pub use error::{Error, FetchError, Result, ValidateError};
pub use extraction::{MetadataExtractor, NormalizedMetadata};
pub use fetcher::Fetcher;
pub use limiter::{RateGate, SlidingWindowLimiter};
pub use service::ExtractionService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
