//! Normalized preview metadata
//!
//! Turns fetched HTML into the one record the rest of the system consumes.
//! Extraction never fails: a malformed or minimal page simply yields empty
//! fields, which keeps the pipeline resilient to whatever the web serves.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::sources::{
    first_meta, DESCRIPTION_SOURCES, FAVICON_SELECTOR, IMAGE_SOURCES, SITE_NAME_SOURCES,
    THEME_COLOR_SOURCES, TITLE_SOURCES, TWITTER_CARD_SOURCES, URL_SOURCES,
};

/// Card type used when a page declares no `twitter:card`.
pub const DEFAULT_TWITTER_CARD: &str = "summary";

/// Social-preview metadata for one page.
///
/// Constructed fresh per request and serialized straight to the caller in
/// camelCase, the shape preview clients consume. Values are plain text;
/// escaping for any particular markup context is the presentation layer's
/// job. `image` and `favicon` are absolute URLs whenever non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMetadata {
    /// Best title: OG → Twitter → document `<title>`; may be empty only if
    /// the page offers none of them
    pub title: String,
    /// Best description, or empty
    pub description: String,
    /// Preview image resolved against the page URL, or empty
    pub image: String,
    /// Canonical URL: `og:url` if present, else the fetched URL
    pub url: String,
    /// `og:site_name`, or empty
    pub site_name: String,
    /// `twitter:card` token, defaulting to `"summary"`
    pub twitter_card: String,
    /// `theme-color` CSS color string, unvalidated, or empty
    pub theme_color: String,
    /// Favicon resolved against the page URL, or empty
    pub favicon: String,
    /// Hostname of `url` with one leading `www.` stripped
    pub domain: String,
}

/// Metadata extraction over a fetched document
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract preview metadata from HTML fetched at `page_url`.
    ///
    /// For each field the priority-ordered sources in
    /// [`super::sources`] are tried and the first non-empty trimmed value
    /// wins. Relative `image`/`favicon` values are resolved against
    /// `page_url` here, exactly once; values that fail to resolve are kept
    /// verbatim rather than dropped.
    #[instrument(skip(html), fields(page_url = %page_url))]
    pub fn extract(html: &str, page_url: &Url) -> NormalizedMetadata {
        let doc = Html::parse_document(html);

        let title = first_meta(&doc, TITLE_SOURCES).unwrap_or_else(|| document_title(&doc));
        let description = first_meta(&doc, DESCRIPTION_SOURCES).unwrap_or_default();
        let image = first_meta(&doc, IMAGE_SOURCES).unwrap_or_default();
        let url = first_meta(&doc, URL_SOURCES).unwrap_or_else(|| page_url.to_string());
        let site_name = first_meta(&doc, SITE_NAME_SOURCES).unwrap_or_default();
        let twitter_card = first_meta(&doc, TWITTER_CARD_SOURCES)
            .unwrap_or_else(|| DEFAULT_TWITTER_CARD.to_string());
        let theme_color = first_meta(&doc, THEME_COLOR_SOURCES).unwrap_or_default();
        let favicon = first_favicon(&doc).unwrap_or_default();

        let metadata = NormalizedMetadata {
            title,
            description,
            image: resolve_against(&image, page_url),
            domain: domain_of(&url),
            url,
            site_name,
            twitter_card,
            theme_color,
            favicon: resolve_against(&favicon, page_url),
        };

        debug!(title = %metadata.title, domain = %metadata.domain, "metadata extracted");
        metadata
    }
}

/// Text of the document `<title>`, trimmed; empty when absent.
fn document_title(doc: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// `href` of the first favicon link in document order.
fn first_favicon(doc: &Html) -> Option<String> {
    let selector = Selector::parse(FAVICON_SELECTOR).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string)
}

/// Resolve a possibly-relative URL against the page URL.
///
/// Unresolvable values are kept verbatim; empty stays empty.
fn resolve_against(raw: &str, base: &Url) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match base.join(raw) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Hostname of a canonical URL with one leading `www.` stripped.
///
/// Parse failures yield an empty domain, silently.
fn domain_of(canonical: &str) -> String {
    match Url::parse(canonical) {
        Ok(url) => {
            let host = url.host_str().unwrap_or("");
            host.strip_prefix("www.").unwrap_or(host).to_string()
        }
        Err(_) => String::new(),
    }
}
