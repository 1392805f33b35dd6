//! Metadata extraction module
//!
//! Parses fetched HTML into the normalized preview record using a
//! priority-ordered, declarative source table per field.

pub mod metadata;
pub mod sources;

pub use metadata::{MetadataExtractor, NormalizedMetadata, DEFAULT_TWITTER_CARD};
pub use sources::MetaSource;
