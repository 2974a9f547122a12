//! Request path normalization
//!
//! Lexical cleaning only: no filesystem access, so it behaves the same for
//! every [`VirtualFs`](crate::fs::VirtualFs) backend.

use std::borrow::Cow;

/// Decode percent escapes and clean the result.
///
/// Invalid UTF-8 after decoding leaves the raw path in place.
pub fn clean_request_path(raw: &str) -> String {
    let decoded = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    clean_path(&decoded)
}

/// Rooted lexical path cleaning.
///
/// Repeated slashes collapse, `.` segments are removed, and `..` removes the
/// previous segment but never climbs above the root. The result always starts
/// with `/` and has no trailing slash (except the root itself).
///
/// # Examples
/// ```
/// use embed_spa::handler::path::clean_path;
/// assert_eq!(clean_path("/a//b/./c/.."), "/a/b");
/// assert_eq!(clean_path("/../../etc/passwd"), "/etc/passwd");
/// assert_eq!(clean_path(""), "/");
/// ```
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Remove `prefix` when it is a whole leading segment run of `path`.
///
/// `/app` is stripped from `/app` and `/app/x`, but not from `/application.js`.
pub fn strip_url_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return path;
    }
    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}
