//! HTTP cache control module
//!
//! Provides `ETag` fingerprinting, validator matching and the cache header
//! values attached to every served file.

use chrono::{DateTime, Duration, Utc};
use hyper::header::{self, HeaderMap, HeaderValue};

use crate::fs::FileMetadata;

/// Freshness window advertised to clients: 7 days
pub const MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// IMF-fixdate, the preferred HTTP date format (RFC 9110 section 5.6.7)
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Strategy computing the validator of a served file.
///
/// `path` is the cleaned request path (before prefix stripping), `metadata`
/// belongs to the file actually served, which is the index document for
/// fallback requests. The returned string is used verbatim as the `ETag`.
pub trait Fingerprint: Send + Sync {
    fn fingerprint(&self, path: &str, metadata: &FileMetadata) -> String;
}

impl<F> Fingerprint for F
where
    F: Fn(&str, &FileMetadata) -> String + Send + Sync,
{
    fn fingerprint(&self, path: &str, metadata: &FileMetadata) -> String {
        self(path, metadata)
    }
}

/// Default strategy: hex MD5 over size and modification time
#[derive(Debug, Default, Clone, Copy)]
pub struct Md5Fingerprint;

impl Fingerprint for Md5Fingerprint {
    fn fingerprint(&self, _path: &str, metadata: &FileMetadata) -> String {
        generate_etag(metadata)
    }
}

/// Generate an `ETag` from file metadata
///
/// The digest input is `"{size}-{modified}"` with the modification time in
/// UTC, e.g. `50-2024-01-02 03:04:05.1 +0000 UTC`. Fractional seconds keep
/// only their significant digits and are omitted when zero. MD5 is used for
/// a compact, stable value, not for security.
///
/// # Returns
/// 32 lowercase hex characters, unquoted
pub fn generate_etag(metadata: &FileMetadata) -> String {
    let modified = &metadata.modified;
    let nanos = modified.timestamp_subsec_nanos() % 1_000_000_000;
    let fraction = if nanos == 0 {
        String::new()
    } else {
        format!(".{nanos:09}").trim_end_matches('0').to_string()
    };
    let seed = format!(
        "{}-{}{fraction} +0000 UTC",
        metadata.size,
        modified.format("%Y-%m-%d %H:%M:%S")
    );
    format!("{:x}", md5::compute(seed.as_bytes()))
}

/// Exact comparison of the client's `If-None-Match` with the validator
pub fn validator_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| client_etag == etag)
}

/// Check if client's `If-None-Match` header matches any listed `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .map(str::trim)
            .any(|e| e == etag || e == "*" || e.strip_prefix("W/") == Some(etag))
    })
}

/// `Cache-Control` value for the given freshness window
pub fn cache_control(max_age: i64) -> String {
    format!("max-age={max_age}")
}

/// Format a timestamp as an HTTP date
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP date (IMF-fixdate or any RFC 2822 form)
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Absolute expiry for a response built at `now`
pub fn expires_at(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::seconds(MAX_AGE_SECS)
}

/// Headers sent with every full (non-304) response
///
/// An `ETag` that is not a valid header value is left out rather than
/// failing the response.
pub fn cache_headers(etag: &str, now: DateTime<Utc>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&cache_control(MAX_AGE_SECS)) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    match HeaderValue::from_str(etag) {
        Ok(value) => {
            headers.insert(header::ETAG, value);
        }
        Err(e) => tracing::warn!(etag, error = %e, "Fingerprint is not a valid header value"),
    }
    if let Ok(value) = HeaderValue::from_str(&http_date(expires_at(now))) {
        headers.insert(header::EXPIRES, value);
    }
    headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(size: u64, secs: i64) -> FileMetadata {
        FileMetadata {
            size,
            modified: DateTime::from_timestamp(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(&meta(50, 1_700_000_000));
        assert_eq!(etag.len(), 32);
        assert!(etag.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_etag_is_md5_of_size_and_time() {
        // 2023-11-14 22:13:20 UTC
        let etag = generate_etag(&meta(50, 1_700_000_000));
        let expected = format!("{:x}", md5::compute(b"50-2023-11-14 22:13:20 +0000 UTC"));
        assert_eq!(etag, expected);
    }

    #[test]
    fn test_etag_fraction_drops_trailing_zeros() {
        let at = |nanos| FileMetadata {
            size: 50,
            modified: DateTime::from_timestamp(1_700_000_000, nanos).unwrap(),
        };
        let expected = format!("{:x}", md5::compute(b"50-2023-11-14 22:13:20.1 +0000 UTC"));
        assert_eq!(generate_etag(&at(100_000_000)), expected);
        let expected = format!("{:x}", md5::compute(b"50-2023-11-14 22:13:20.000123 +0000 UTC"));
        assert_eq!(generate_etag(&at(123_000)), expected);
        let expected = format!("{:x}", md5::compute(b"50-2023-11-14 22:13:20.000000007 +0000 UTC"));
        assert_eq!(generate_etag(&at(7)), expected);
    }

    #[test]
    fn test_etag_consistency() {
        let a = meta(100, 1_600_000_000);
        assert_eq!(generate_etag(&a), generate_etag(&a));
        assert_eq!(Md5Fingerprint.fingerprint("/x", &a), Md5Fingerprint.fingerprint("/y", &a));
    }

    #[test]
    fn test_etag_difference() {
        assert_ne!(generate_etag(&meta(100, 1_600_000_000)), generate_etag(&meta(101, 1_600_000_000)));
        assert_ne!(generate_etag(&meta(100, 1_600_000_000)), generate_etag(&meta(100, 1_600_000_001)));
    }

    #[test]
    fn test_closure_fingerprint() {
        let build_id = |_: &str, m: &FileMetadata| format!("build-42-{}", m.size);
        assert_eq!(build_id.fingerprint("/app", &meta(7, 0)), "build-42-7");
    }

    #[test]
    fn test_validator_matches_exactly() {
        assert!(validator_matches(Some("abc123"), "abc123"));
        assert!(!validator_matches(Some("\"abc123\""), "abc123"));
        assert!(!validator_matches(Some("*"), "abc123"));
        assert!(!validator_matches(None, "abc123"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_http_date() {
        let t = DateTime::from_timestamp(1_136_214_245, 0).unwrap();
        assert_eq!(http_date(t), "Mon, 02 Jan 2006 15:04:05 GMT");
        assert_eq!(parse_http_date("Mon, 02 Jan 2006 15:04:05 GMT"), Some(t));
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn test_cache_headers() {
        let now = DateTime::from_timestamp(1_136_214_245, 0).unwrap();
        let headers = cache_headers("abc", now);
        assert_eq!(headers[header::CACHE_CONTROL], "max-age=604800");
        assert_eq!(headers[header::ETAG], "abc");
        assert_eq!(headers[header::EXPIRES], "Mon, 09 Jan 2006 15:04:05 GMT");
        assert_eq!(headers[header::VARY], "Accept-Encoding");
    }

    #[test]
    fn test_invalid_etag_is_skipped() {
        let headers = cache_headers("bad\nvalue", Utc::now());
        assert!(headers.get(header::ETAG).is_none());
        assert!(headers.get(header::CACHE_CONTROL).is_some());
    }
}
