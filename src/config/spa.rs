//! Immutable SPA handler configuration
//!
//! Built once with [`SpaConfig::builder`] and shared behind an `Arc`; nothing
//! mutates it while requests are served.

use std::fmt;
use std::sync::Arc;

use super::types::SpaSettings;
use crate::http::cache::{Fingerprint, Md5Fingerprint};

#[derive(Clone)]
pub struct SpaConfig {
    index_path: String,
    strip_prefix: String,
    fingerprint: Arc<dyn Fingerprint>,
}

impl SpaConfig {
    pub fn builder() -> SpaConfigBuilder {
        SpaConfigBuilder::default()
    }

    /// Key of the document served for unmatched routes
    pub fn index_path(&self) -> &str {
        &self.index_path
    }

    /// Normalized URL prefix (`/app`), empty when unset
    pub fn strip_prefix(&self) -> &str {
        &self.strip_prefix
    }

    pub fn fingerprint(&self) -> &dyn Fingerprint {
        self.fingerprint.as_ref()
    }
}

impl Default for SpaConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for SpaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpaConfig")
            .field("index_path", &self.index_path)
            .field("strip_prefix", &self.strip_prefix)
            .finish_non_exhaustive()
    }
}

impl From<&SpaSettings> for SpaConfig {
    fn from(settings: &SpaSettings) -> Self {
        Self::builder()
            .index_path(&settings.index_path)
            .strip_prefix(&settings.strip_prefix)
            .build()
    }
}

#[derive(Default)]
pub struct SpaConfigBuilder {
    index_path: String,
    strip_prefix: String,
    fingerprint: Option<Arc<dyn Fingerprint>>,
}

impl SpaConfigBuilder {
    /// Leading slashes are dropped: `/index.html` and `index.html` are the same key.
    #[must_use]
    pub fn index_path(mut self, path: impl Into<String>) -> Self {
        self.index_path = path.into().trim_start_matches('/').to_string();
        self
    }

    /// Stored rooted and without a trailing slash; `/` and `""` disable stripping.
    #[must_use]
    pub fn strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_matches('/');
        self.strip_prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        self
    }

    /// Replace the default MD5 validator with a custom strategy
    #[must_use]
    pub fn fingerprint(mut self, fingerprint: impl Fingerprint + 'static) -> Self {
        self.fingerprint = Some(Arc::new(fingerprint));
        self
    }

    pub fn build(self) -> SpaConfig {
        SpaConfig {
            index_path: self.index_path,
            strip_prefix: self.strip_prefix,
            fingerprint: self
                .fingerprint
                .unwrap_or_else(|| Arc::new(Md5Fingerprint) as Arc<dyn Fingerprint>),
        }
    }
}
