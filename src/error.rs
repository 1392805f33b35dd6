//! Error types for LinkLens
//!
//! The extraction pipeline surfaces every failure through one taxonomy so the
//! HTTP layer can perform a single error-kind → status/message mapping step.
//! The extractor itself never fails; all errors originate in the validator or
//! the fetcher.

use http::StatusCode;
use thiserror::Error;

/// The main error type for extraction operations
#[derive(Error, Debug)]
pub enum Error {
    /// URL validation failures
    #[error("{0}")]
    Validate(#[from] ValidateError),

    /// Fetch failures
    #[error("{0}")]
    Fetch(#[from] FetchError),

    /// The `url` query parameter was not supplied
    #[error("URL parameter is required")]
    MissingParameter,

    /// The client exceeded its request window
    #[error("Too many requests. Try again in a minute.")]
    RateLimited,
}

/// URL validation errors
///
/// Rules are applied in order: parse, scheme, literal host blocklist, private
/// IPv4 ranges. The messages here are surfaced to the caller verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// Input could not be parsed as a URL at all
    #[error("Invalid URL")]
    InvalidUrl,

    /// Scheme other than http/https
    #[error("Only HTTP and HTTPS URLs are allowed")]
    SchemeNotAllowed,

    /// Hostname is a literal loopback/unspecified address
    #[error("Local/private URLs are not allowed")]
    LoopbackHost,

    /// Dotted-quad host inside a private or reserved range
    #[error("Private IP addresses are not allowed")]
    PrivateAddress,
}

/// Fetch errors
///
/// Network-level failures stay distinct (DNS, refused, timeout) because the
/// caller renders different guidance per kind.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No completed response within the fetch deadline
    #[error("request timed out after {0} s")]
    Timeout(u64),

    /// Response Content-Type is not an HTML type
    #[error("URL does not return HTML")]
    NotHtml,

    /// DNS resolution failed
    #[error("host not found")]
    HostNotFound,

    /// TCP connection refused
    #[error("connection refused")]
    ConnectionRefused,

    /// Upstream returned a non-2xx status
    #[error("HTTP {status}: {status_text}")]
    UpstreamStatus {
        /// Numeric HTTP status code
        status: u16,
        /// Canonical reason phrase
        status_text: String,
    },

    /// A redirect hop targeted a private address
    #[error("redirect to a private address was blocked")]
    RedirectNotAllowed,

    /// Anything else (TLS errors, protocol errors, ...)
    #[error("{0}")]
    Unclassified(String),
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status code for this error kind.
    ///
    /// Pipeline failures are client-visible 422s; only the missing parameter
    /// (400) and the rate gate (429) differ.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingParameter => StatusCode::BAD_REQUEST,
            Error::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Error::Validate(_) | Error::Fetch(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Human-readable message rendered to the caller.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validate(ValidateError::InvalidUrl) => {
                "That doesn't look like a valid URL. Double-check for typos?".to_string()
            }
            // Scheme and private-address rules surface their exact message
            Error::Validate(e) => e.to_string(),
            Error::Fetch(FetchError::Timeout(_)) => {
                "This site took too long to respond. It might be down, or the URL may be wrong."
                    .to_string()
            }
            Error::Fetch(FetchError::NotHtml) => {
                "This URL didn't return an HTML page. Make sure it points to a website, not a file or API."
                    .to_string()
            }
            Error::Fetch(FetchError::HostNotFound) => {
                "We couldn't reach this site. Was there a typo in the URL?".to_string()
            }
            Error::Fetch(FetchError::ConnectionRefused) => {
                "Connection refused. This site doesn't seem to be accepting requests right now."
                    .to_string()
            }
            Error::Fetch(FetchError::UpstreamStatus {
                status,
                status_text,
            }) => {
                format!(
                    "This site returned an error (HTTP {status}: {status_text}). It might be blocking automated requests."
                )
            }
            Error::Fetch(FetchError::RedirectNotAllowed) => {
                "This site redirected to a private address, which is not allowed.".to_string()
            }
            Error::Fetch(FetchError::Unclassified(_)) => {
                "We couldn't reach this URL. Was there a typo?".to_string()
            }
            Error::MissingParameter | Error::RateLimited => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::MissingParameter.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            Error::Validate(ValidateError::InvalidUrl).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::Fetch(FetchError::Timeout(10)).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_validator_messages_surface_verbatim() {
        let err = Error::Validate(ValidateError::SchemeNotAllowed);
        assert_eq!(err.user_message(), "Only HTTP and HTTPS URLs are allowed");

        let err = Error::Validate(ValidateError::LoopbackHost);
        assert_eq!(err.user_message(), "Local/private URLs are not allowed");

        let err = Error::Validate(ValidateError::PrivateAddress);
        assert_eq!(err.user_message(), "Private IP addresses are not allowed");
    }

    #[test]
    fn test_invalid_url_message_is_rewritten() {
        let err = Error::Validate(ValidateError::InvalidUrl);
        assert!(err.user_message().contains("valid URL"));
        assert!(err.user_message().contains("typos"));
    }

    #[test]
    fn test_upstream_status_message_includes_code() {
        let err = Error::Fetch(FetchError::UpstreamStatus {
            status: 403,
            status_text: "Forbidden".to_string(),
        });
        let msg = err.user_message();
        assert!(msg.contains("HTTP 403: Forbidden"));
        assert!(msg.contains("blocking automated requests"));
    }

    #[test]
    fn test_unclassified_hides_internal_detail() {
        let err = Error::Fetch(FetchError::Unclassified("tls handshake eof".to_string()));
        assert!(!err.user_message().contains("tls"));
        assert!(err.user_message().contains("couldn't reach"));
    }

    #[test]
    fn test_missing_parameter_message() {
        assert_eq!(
            Error::MissingParameter.user_message(),
            "URL parameter is required"
        );
    }

    #[test]
    fn test_rate_limited_message() {
        assert_eq!(
            Error::RateLimited.user_message(),
            "Too many requests. Try again in a minute."
        );
    }
}
