//! SPA resolver and cache validator
//!
//! Maps a request path onto the virtual file tree, falls back to the index
//! document for client-side routes, and answers `304 Not Modified` when the
//! client's `If-None-Match` equals the file's validator. Everything else is
//! handed to [`serve_file`].

use std::sync::Arc;

use chrono::Utc;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::IF_NONE_MATCH;
use hyper::{Method, Request, Response};

use super::path::{clean_request_path, strip_url_prefix};
use crate::config::SpaConfig;
use crate::fs::{FileHandle, VirtualFs};
use crate::http::{self, cache, serve_file};

/// Outcome of looking up a resolved key
#[derive(Debug)]
pub enum Lookup {
    /// The key itself exists
    Exact(FileHandle),
    /// The key is absent; this is the index document
    Fallback(FileHandle),
    /// Neither the key nor the index document could be opened
    Missing,
}

pub struct SpaHandler {
    fs: Arc<dyn VirtualFs>,
    config: Arc<SpaConfig>,
}

impl SpaHandler {
    pub fn new(fs: Arc<dyn VirtualFs>, config: SpaConfig) -> Self {
        Self {
            fs,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SpaConfig {
        &self.config
    }

    /// Lookup key for a raw request path.
    ///
    /// Decodes and cleans the path, strips the configured prefix and the
    /// leading slash, and substitutes the index path when nothing is left.
    pub fn resolve_path(&self, request_path: &str) -> String {
        self.lookup_key(&clean_request_path(request_path))
    }

    fn lookup_key(&self, cleaned: &str) -> String {
        let key = strip_url_prefix(cleaned, self.config.strip_prefix()).trim_start_matches('/');
        if key.is_empty() {
            self.config.index_path().to_string()
        } else {
            key.to_string()
        }
    }

    /// Open `key`, or the index document when `key` is absent
    pub fn lookup(&self, key: &str) -> Lookup {
        match self.fs.open(key) {
            Ok(file) => Lookup::Exact(file),
            Err(miss) => {
                tracing::debug!(key, reason = %miss, "Falling back to index document");
                match self.fs.open(self.config.index_path()) {
                    Ok(index) => Lookup::Fallback(index),
                    Err(e) => {
                        tracing::error!(
                            index_path = self.config.index_path(),
                            error = %e,
                            "Index document cannot be opened"
                        );
                        Lookup::Missing
                    }
                }
            }
        }
    }

    /// Answer a request.
    ///
    /// The file handle lives only for this call.
    pub fn handle<B>(&self, req: &Request<B>) -> Response<Full<Bytes>> {
        let request_path = clean_request_path(req.uri().path());
        let key = self.lookup_key(&request_path);

        let (file, fallback) = match self.lookup(&key) {
            Lookup::Exact(file) => (file, false),
            Lookup::Fallback(file) => (file, true),
            Lookup::Missing => return http::build_404_response(),
        };

        let etag = self
            .config
            .fingerprint()
            .fingerprint(&request_path, file.metadata());

        let if_none_match = req
            .headers()
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok());
        if cache::validator_matches(if_none_match, &etag) {
            return http::build_304_response();
        }

        tracing::debug!(
            path = %request_path,
            file = file.path(),
            fallback,
            "Serving static file"
        );

        let headers = cache::cache_headers(&etag, Utc::now());
        serve_file(&file, req.headers(), req.method() == Method::HEAD, headers)
    }
}
