//! Extraction pipeline composition
//!
//! The composition root: Validator → Fetcher → Extractor. Each request runs
//! as an independent task with no shared mutable state; failures propagate
//! unchanged to the HTTP layer, which owns the single error → response
//! mapping step. There are no retries here: a failed fetch surfaces
//! immediately, and retry policy belongs to the caller.

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::extraction::{MetadataExtractor, NormalizedMetadata};
use crate::fetcher::Fetcher;
use crate::validator;

/// Orchestrates one extraction request end to end.
#[derive(Debug, Clone, Default)]
pub struct ExtractionService {
    fetcher: Fetcher,
}

impl ExtractionService {
    /// Create a service with a default fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service around an existing fetcher.
    pub fn with_fetcher(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Validate `raw_url`, fetch it under the resource bounds, and extract
    /// the normalized metadata record.
    ///
    /// The extractor itself never fails, so every error out of here is a
    /// validation or fetch failure.
    #[instrument(skip(self, raw_url), fields(request_id = %Uuid::new_v4()))]
    pub async fn extract_from_url(&self, raw_url: &str) -> Result<NormalizedMetadata> {
        let url = validator::validate(raw_url)?;
        let html = self.fetcher.fetch(&url).await?;
        let metadata = MetadataExtractor::extract(&html, &url);

        info!(url = %url, title = %metadata.title, "extraction complete");
        Ok(metadata)
    }
}
