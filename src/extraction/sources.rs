//! Metadata source tables
//!
//! Extraction policy lives here as data: for each output field, an ordered
//! list of places the value may come from, consumed by one generic
//! first-match-wins lookup. Keeping the priority lists declarative lets them
//! be tested independently of the DOM-query mechanics.

use scraper::{Html, Selector};

/// One place a metadata value may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaSource {
    /// `<meta property="...">`
    Property(&'static str),
    /// `<meta name="...">`
    Name(&'static str),
}

impl MetaSource {
    fn selector(&self) -> String {
        match self {
            MetaSource::Property(key) => format!(r#"meta[property="{key}"]"#),
            MetaSource::Name(key) => format!(r#"meta[name="{key}"]"#),
        }
    }
}

use MetaSource::{Name, Property};

/// Title sources; the document `<title>` is a separate final fallback.
pub const TITLE_SOURCES: &[MetaSource] = &[
    Property("og:title"),
    Name("og:title"),
    Name("twitter:title"),
    Property("twitter:title"),
];

/// Description sources.
pub const DESCRIPTION_SOURCES: &[MetaSource] = &[
    Property("og:description"),
    Name("og:description"),
    Name("twitter:description"),
    Property("twitter:description"),
    Name("description"),
];

/// Image sources, pre-resolution.
pub const IMAGE_SOURCES: &[MetaSource] = &[
    Property("og:image"),
    Name("og:image"),
    Name("twitter:image"),
    Property("twitter:image"),
    Name("twitter:image:src"),
];

/// Canonical URL sources; the fetched page URL is the final fallback.
pub const URL_SOURCES: &[MetaSource] = &[Property("og:url"), Name("og:url")];

/// Site name sources.
pub const SITE_NAME_SOURCES: &[MetaSource] = &[Property("og:site_name"), Name("og:site_name")];

/// Card type sources; absent yields the baseline `"summary"` token.
pub const TWITTER_CARD_SOURCES: &[MetaSource] = &[Name("twitter:card"), Property("twitter:card")];

/// Theme color sources. The value is an unvalidated CSS color string.
pub const THEME_COLOR_SOURCES: &[MetaSource] = &[Name("theme-color"), Property("theme-color")];

/// Favicon link elements, matched in document order across all three rels.
pub const FAVICON_SELECTOR: &str =
    r#"link[rel="icon"], link[rel="shortcut icon"], link[rel="apple-touch-icon"]"#;

/// First non-empty, trimmed value among the ordered sources.
///
/// Each source inspects only the first element it matches, reading its
/// `content` attribute and falling back to `value` when `content` is absent
/// or blank.
pub fn first_meta(doc: &Html, sources: &[MetaSource]) -> Option<String> {
    for source in sources {
        let Ok(selector) = Selector::parse(&source.selector()) else {
            continue;
        };
        if let Some(element) = doc.select(&selector).next() {
            let raw = element
                .value()
                .attr("content")
                .filter(|v| !v.trim().is_empty())
                .or_else(|| element.value().attr("value"));
            if let Some(raw) = raw {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}
