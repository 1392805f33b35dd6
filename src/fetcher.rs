//! Bounded HTML fetching
//!
//! Performs the single outbound GET of the pipeline under three independent
//! bounds: a wall-clock deadline anchored at fetch start, a Content-Type gate,
//! and a hard cap on bytes read. The byte cap is not an error: whatever was
//! read before the cap is kept, so huge pages still yield a best-effort
//! extraction.
//!
//! Redirects are followed (up to [`MAX_REDIRECTS`] hops) and every hop is
//! re-checked against the validator's host rules, so a public page cannot
//! bounce the fetcher into private address space.

use std::fmt;
use std::time::Duration;

use futures::{Stream, StreamExt};
use reqwest::{header, redirect};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetchError;
use crate::validator;

/// Wall-clock deadline for the whole fetch, connect through body read.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Hard cap on response body bytes.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Maximum redirect hops before the fetch is abandoned.
pub const MAX_REDIRECTS: usize = 10;

/// Fixed identifying User-Agent sent with every request.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; LinkLens/1.0; +https://github.com/linklens/linklens)";

const ACCEPT: &str = "text/html,application/xhtml+xml";

/// Marker error attached to redirect hops rejected by the host rules, so the
/// classifier can tell them apart from too-many-redirects failures.
#[derive(Debug)]
struct RedirectBlocked;

impl fmt::Display for RedirectBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("redirect target is a private address")
    }
}

impl std::error::Error for RedirectBlocked {}

/// HTML fetcher with timeout, redirect re-validation, and a bounded body read.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    /// Create a fetcher with the default bounds.
    pub fn new() -> Self {
        let policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() > MAX_REDIRECTS {
                return attempt.error("too many redirects");
            }
            let host = attempt.url().host_str().unwrap_or("").to_string();
            if validator::host_is_disallowed(&host) {
                warn!(target_host = %host, "blocked redirect into private address space");
                return attempt.error(RedirectBlocked);
            }
            attempt.follow()
        });

        Self {
            client: reqwest::Client::builder()
                .redirect(policy)
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Fetch a validated URL and return its decoded HTML.
    ///
    /// The deadline covers the entire call: connect, headers, and the
    /// incremental body read. When it fires the in-flight read is dropped and
    /// the result is always [`FetchError::Timeout`], never partial HTML. The
    /// size bound behaves differently: crossing it simply stops the read and
    /// returns what was accumulated so far.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        match tokio::time::timeout(FETCH_TIMEOUT, self.fetch_inner(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(FETCH_TIMEOUT.as_secs())),
        }
    }

    async fn fetch_inner(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !is_html_content_type(content_type) {
            return Err(FetchError::NotHtml);
        }

        let body = read_bounded(response.bytes_stream(), MAX_BODY_BYTES)
            .await
            .map_err(classify_reqwest_error)?;

        debug!(bytes = body.len(), "body read complete");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Whether a Content-Type header value is an HTML type we will parse.
fn is_html_content_type(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml")
}

/// Read chunks from a byte stream until it is exhausted or the cap is crossed.
///
/// The chunk that crosses the cap is discarded along with the rest of the
/// stream; everything read before it is kept. Dropping the stream releases the
/// underlying connection.
pub async fn read_bounded<S, B, E>(mut stream: S, cap: usize) -> Result<Vec<u8>, E>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut buf = Vec::new();
    let mut total = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let bytes = chunk.as_ref();
        total += bytes.len();
        if total > cap {
            break;
        }
        buf.extend_from_slice(bytes);
    }

    Ok(buf)
}

/// Map a reqwest error to the fetch taxonomy.
///
/// DNS failures, refused connections, and timeouts stay distinct because the
/// caller renders different guidance per kind. Classification walks the error
/// source chain; hyper surfaces DNS problems as a "dns error" connect failure
/// and refused connections as an `io::Error` with `ConnectionRefused`.
fn classify_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout(FETCH_TIMEOUT.as_secs());
    }

    if err.is_redirect() {
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            if inner.is::<RedirectBlocked>() {
                return FetchError::RedirectNotAllowed;
            }
            source = inner.source();
        }
        return FetchError::Unclassified(err.to_string());
    }

    let mut source = std::error::Error::source(&err);
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return FetchError::ConnectionRefused;
            }
        }
        let text = inner.to_string();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return FetchError::HostNotFound;
        }
        source = inner.source();
    }

    FetchError::Unclassified(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::convert::Infallible;

    fn chunks(sizes: &[usize]) -> Vec<Result<Vec<u8>, Infallible>> {
        sizes.iter().map(|n| Ok(vec![b'x'; *n])).collect()
    }

    #[tokio::test]
    async fn test_read_bounded_under_cap() {
        let stream = stream::iter(chunks(&[100, 100, 100]));
        let body = read_bounded(stream, 1000).await.unwrap();
        assert_eq!(body.len(), 300);
    }

    #[tokio::test]
    async fn test_read_bounded_drops_crossing_chunk() {
        // third chunk crosses the cap and is discarded entirely
        let stream = stream::iter(chunks(&[1000, 1000, 1000, 1000]));
        let body = read_bounded(stream, 2500).await.unwrap();
        assert_eq!(body.len(), 2000);
    }

    #[tokio::test]
    async fn test_read_bounded_exact_cap_is_kept() {
        let stream = stream::iter(chunks(&[1000, 1000]));
        let body = read_bounded(stream, 2000).await.unwrap();
        assert_eq!(body.len(), 2000);
    }

    #[tokio::test]
    async fn test_read_bounded_oversized_body_is_truncated() {
        // 5 MiB in 64 KiB chunks against the 2 MiB cap
        let chunk = 64 * 1024;
        let stream = stream::iter(chunks(&vec![chunk; 80]));
        let body = read_bounded(stream, MAX_BODY_BYTES).await.unwrap();
        assert!(body.len() <= MAX_BODY_BYTES);
        assert!(body.len() >= MAX_BODY_BYTES - chunk);
    }

    #[tokio::test]
    async fn test_read_bounded_propagates_stream_errors() {
        let items: Vec<Result<Vec<u8>, &str>> = vec![Ok(vec![1, 2, 3]), Err("boom")];
        let stream = stream::iter(items);
        assert_eq!(read_bounded(stream, 100).await.unwrap_err(), "boom");
    }

    #[tokio::test]
    async fn test_read_bounded_empty_stream() {
        let stream = stream::iter(chunks(&[]));
        let body = read_bounded(stream, 100).await.unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_html_content_types() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(!is_html_content_type("application/json"));
        assert!(!is_html_content_type("image/png"));
        assert!(!is_html_content_type(""));
    }

    #[test]
    fn test_lossy_decode_of_truncated_multibyte() {
        // a body cut mid-way through a multi-byte sequence still decodes
        let mut body = "héllo".as_bytes().to_vec();
        body.truncate(2); // splits the two-byte 'é'
        let text = String::from_utf8_lossy(&body).into_owned();
        assert!(text.starts_with('h'));
        assert_eq!(text.chars().count(), 2);
    }

    #[test]
    fn test_user_agent_identifies_service() {
        assert!(USER_AGENT.contains("LinkLens"));
    }
}
