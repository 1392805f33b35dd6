//! URL validation and SSRF guard
//!
//! Accepts raw user input and returns a canonical absolute URL, rejecting
//! disallowed schemes and literal private/loopback hosts before any network
//! traffic happens.
//!
//! This is a best-effort guard based on literal hostnames only: it does not
//! resolve DNS, so a public hostname pointing at a private IP will pass.
//! That limitation is intentional and documented rather than silently fixed.

use url::Url;

use crate::error::ValidateError;

/// Hostnames rejected outright, compared case-insensitively.
const BLOCKED_HOSTS: [&str; 5] = ["localhost", "127.0.0.1", "0.0.0.0", "::1", "[::1]"];

/// Validate a raw URL string and return its canonical parsed form.
///
/// Rules, applied in order:
/// 1. must parse as a URL
/// 2. scheme must be `http` or `https`
/// 3. hostname must not be a literal loopback/unspecified address
/// 4. dotted-quad hostnames must not fall in a private or reserved range
pub fn validate(input: &str) -> Result<Url, ValidateError> {
    let parsed = Url::parse(input).map_err(|_| ValidateError::InvalidUrl)?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(ValidateError::SchemeNotAllowed),
    }

    let host = parsed.host_str().unwrap_or("").to_ascii_lowercase();

    if BLOCKED_HOSTS.contains(&host.as_str()) {
        return Err(ValidateError::LoopbackHost);
    }

    if let Some((a, b)) = dotted_quad_prefix(&host) {
        if in_private_range(a, b) {
            return Err(ValidateError::PrivateAddress);
        }
    }

    Ok(parsed)
}

/// Whether a hostname would be rejected by the blocklist or range rules.
///
/// Used by the fetcher to re-apply the same policy to redirect targets.
pub fn host_is_disallowed(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    if BLOCKED_HOSTS.contains(&host.as_str()) {
        return true;
    }
    matches!(dotted_quad_prefix(&host), Some((a, b)) if in_private_range(a, b))
}

/// First two octets of a dotted-quad IPv4 literal, or `None` if the host is
/// not four all-numeric segments.
fn dotted_quad_prefix(host: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = host.split('.').collect();
    if parts.len() != 4 {
        return None;
    }
    if !parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }
    let a = parts[0].parse().ok()?;
    let b = parts[1].parse().ok()?;
    Some((a, b))
}

/// Private/reserved IPv4 ranges checked against the first two octets:
/// 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16, 0.0.0.0/8, 169.254.0.0/16.
fn in_private_range(a: u32, b: u32) -> bool {
    a == 10
        || (a == 172 && (16..=31).contains(&b))
        || (a == 192 && b == 168)
        || a == 0
        || (a == 169 && b == 254)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_https_url() {
        let url = validate("https://example.com/page?a=1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page?a=1");
    }

    #[test]
    fn test_canonicalization_adds_root_path() {
        let url = validate("https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_scheme_is_normalized() {
        let url = validate("HTTP://EXAMPLE.com/Path").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("example.com"));
        // path case is preserved
        assert_eq!(url.path(), "/Path");
    }

    #[test]
    fn test_unparsable_input() {
        assert_eq!(validate("not a url").unwrap_err(), ValidateError::InvalidUrl);
        assert_eq!(validate("").unwrap_err(), ValidateError::InvalidUrl);
        assert_eq!(
            validate("http//missing.colon").unwrap_err(),
            ValidateError::InvalidUrl
        );
    }

    #[test]
    fn test_disallowed_schemes() {
        for input in [
            "ftp://x",
            "file:///etc/passwd",
            "gopher://hole",
            "javascript:alert(1)",
            "data:text/html,hi",
        ] {
            assert_eq!(
                validate(input).unwrap_err(),
                ValidateError::SchemeNotAllowed,
                "{input} should be rejected by the scheme rule"
            );
        }
    }

    #[test]
    fn test_loopback_hosts_blocked() {
        for input in [
            "http://localhost/",
            "http://localhost:8080/admin",
            "https://127.0.0.1/",
            "http://0.0.0.0/",
            "http://[::1]/",
        ] {
            assert_eq!(
                validate(input).unwrap_err(),
                ValidateError::LoopbackHost,
                "{input} should be rejected as loopback"
            );
        }
    }

    #[test]
    fn test_loopback_check_is_case_insensitive() {
        assert_eq!(
            validate("http://LOCALHOST/").unwrap_err(),
            ValidateError::LoopbackHost
        );
    }

    #[test]
    fn test_private_ranges_blocked() {
        for input in [
            "http://10.0.0.1/",
            "http://10.255.255.255/",
            "http://172.16.0.1/",
            "http://172.31.255.254/",
            "http://192.168.1.1/",
            "http://169.254.169.254/latest/meta-data/",
            "http://0.1.2.3/",
        ] {
            assert_eq!(
                validate(input).unwrap_err(),
                ValidateError::PrivateAddress,
                "{input} should be rejected as private"
            );
        }
    }

    #[test]
    fn test_public_addresses_allowed() {
        for input in [
            "http://8.8.8.8/",
            "http://172.15.0.1/",
            "http://172.32.0.1/",
            "http://11.0.0.1/",
            "http://193.168.1.1/",
        ] {
            assert!(validate(input).is_ok(), "{input} should be allowed");
        }
    }

    #[test]
    fn test_public_hostname_allowed_even_if_it_may_resolve_privately() {
        // documented limitation: no DNS resolution happens here
        assert!(validate("http://internal.corp.example/").is_ok());
    }

    #[test]
    fn test_host_is_disallowed_mirrors_validate() {
        assert!(host_is_disallowed("localhost"));
        assert!(host_is_disallowed("LOCALHOST"));
        assert!(host_is_disallowed("192.168.0.10"));
        assert!(host_is_disallowed("[::1]"));
        assert!(!host_is_disallowed("example.com"));
        assert!(!host_is_disallowed("8.8.8.8"));
    }

    #[test]
    fn test_dotted_quad_detection() {
        assert_eq!(dotted_quad_prefix("10.1.2.3"), Some((10, 1)));
        assert_eq!(dotted_quad_prefix("example.com"), None);
        assert_eq!(dotted_quad_prefix("1.2.3"), None);
        assert_eq!(dotted_quad_prefix("1.2.3.4.5"), None);
        assert_eq!(dotted_quad_prefix("a.b.c.d"), None);
    }
}
