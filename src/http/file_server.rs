//! Generic static file responder
//!
//! Turns an opened [`FileHandle`] into a response: content type, byte ranges,
//! `Last-Modified` / `If-Modified-Since`, and HEAD handling. It knows nothing
//! about SPA routing; callers pass the headers they want on the response and
//! those are kept as-is.

use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Response, StatusCode};

use super::cache;
use super::mime;
use super::range::{parse_range_header, RangeParseResult};
use super::response::with_headers;
use crate::fs::FileHandle;

/// Serve `file` for a request carrying `request_headers`.
///
/// `headers` are pre-set response headers. If they contain an `ETag` it takes
/// part in `If-None-Match` and `If-Range` evaluation.
pub fn serve_file(
    file: &FileHandle,
    request_headers: &HeaderMap,
    is_head: bool,
    mut headers: HeaderMap,
) -> Response<Full<Bytes>> {
    let modified = file.metadata().modified;
    let etag = headers
        .get(header::ETAG)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    if let Ok(value) = HeaderValue::from_str(&cache::http_date(modified)) {
        headers.insert(header::LAST_MODIFIED, value);
    }

    if is_not_modified(request_headers, etag.as_deref(), modified) {
        return with_headers(StatusCode::NOT_MODIFIED, headers, Bytes::new());
    }

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(mime::get_content_type(file.extension())),
    );
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    let data = file.data();
    let total = data.len();
    let range = if range_applies(request_headers, etag.as_deref(), modified) {
        header_str(request_headers, &header::RANGE)
    } else {
        None
    };

    match parse_range_header(range, total) {
        RangeParseResult::Valid(span) => {
            if let Ok(value) = HeaderValue::from_str(&span.content_range(total)) {
                headers.insert(header::CONTENT_RANGE, value);
            }
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(span.len()));
            let body = if is_head {
                Bytes::new()
            } else {
                data.slice(span.start..=span.end)
            };
            with_headers(StatusCode::PARTIAL_CONTENT, headers, body)
        }
        RangeParseResult::NotSatisfiable => {
            let body = Bytes::from_static(b"416 Range Not Satisfiable");
            if let Ok(value) = HeaderValue::from_str(&format!("bytes */{total}")) {
                headers.insert(header::CONTENT_RANGE, value);
            }
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            );
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
            with_headers(StatusCode::RANGE_NOT_SATISFIABLE, headers, body)
        }
        RangeParseResult::None => {
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(total));
            let body = if is_head { Bytes::new() } else { data.clone() };
            with_headers(StatusCode::OK, headers, body)
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// `If-None-Match` wins over `If-Modified-Since` when both are sent
fn is_not_modified(request_headers: &HeaderMap, etag: Option<&str>, modified: DateTime<Utc>) -> bool {
    if let Some(if_none_match) = header_str(request_headers, &header::IF_NONE_MATCH) {
        return etag.is_some_and(|etag| cache::check_etag_match(Some(if_none_match), etag));
    }

    header_str(request_headers, &header::IF_MODIFIED_SINCE)
        .and_then(cache::parse_http_date)
        .is_some_and(|since| modified.timestamp() <= since.timestamp())
}

/// A stale `If-Range` validator turns a range request into a full one
fn range_applies(request_headers: &HeaderMap, etag: Option<&str>, modified: DateTime<Utc>) -> bool {
    let Some(if_range) = header_str(request_headers, &header::IF_RANGE) else {
        return true;
    };
    if etag.is_some_and(|etag| etag == if_range) {
        return true;
    }
    cache::parse_http_date(if_range).is_some_and(|date| date.timestamp() == modified.timestamp())
}
