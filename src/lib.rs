//! Single-page application asset server.
//!
//! Serves a read-only in-memory file tree, answers unmatched routes with the
//! index document, and attaches `ETag`, `Cache-Control`, `Expires` and `Vary`
//! headers, short-circuiting with `304 Not Modified` when the client's copy is
//! current.
//!
//! ```
//! use std::sync::Arc;
//! use chrono::Utc;
//! use embed_spa::{MemoryFs, SpaConfig, SpaHandler};
//!
//! let tree = MemoryFs::new().with_file("index.html", "<html></html>", Utc::now());
//! let config = SpaConfig::builder().index_path("index.html").build();
//! let spa = SpaHandler::new(Arc::new(tree), config);
//!
//! let req = hyper::Request::get("/settings/profile").body(()).unwrap();
//! assert_eq!(spa.handle(&req).status(), 200);
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::{SpaConfig, SpaConfigBuilder};
pub use error::{Error, Result};
pub use fs::{FileHandle, FileMetadata, FsError, MemoryFs, VirtualFs};
pub use handler::{Lookup, SpaHandler};
pub use http::{Fingerprint, Md5Fingerprint};
