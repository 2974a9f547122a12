//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from SPA routing.
//! `file_server` is the generic byte-serving primitive the SPA handler delegates to.

pub mod cache;
pub mod file_server;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use cache::{Fingerprint, Md5Fingerprint};
pub use file_server::serve_file;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_options_response,
};
