//! Virtual file tree module
//!
//! The SPA handler never touches the disk at request time. It resolves paths
//! against a read-only [`VirtualFs`], which is built once at startup and shared
//! by every request.

mod memory;

pub use memory::MemoryFs;

use chrono::{DateTime, Utc};
use hyper::body::Bytes;

/// File tree lookup errors
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("file not found: '{0}'")]
    NotFound(String),
    #[error("'{0}' is a directory")]
    IsDirectory(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Attributes the cache validator is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

/// An opened file: its key, metadata and contents.
///
/// Cloning is cheap; the contents are reference counted.
#[derive(Debug, Clone)]
pub struct FileHandle {
    path: String,
    metadata: FileMetadata,
    data: Bytes,
}

impl FileHandle {
    pub fn new(path: impl Into<String>, data: impl Into<Bytes>, modified: DateTime<Utc>) -> Self {
        let data = data.into();
        Self {
            path: path.into(),
            metadata: FileMetadata {
                size: data.len() as u64,
                modified,
            },
            data,
        }
    }

    /// Key the file was opened under (no leading slash)
    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// File extension, if the last path segment has one
    pub fn extension(&self) -> Option<&str> {
        let name = self.path.rsplit('/').next()?;
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Some(ext),
            _ => None,
        }
    }
}

/// Read-only file tree capability.
///
/// Keys are `/`-separated and relative (`assets/app.js`). Implementations must
/// be safe to open from many requests at once.
pub trait VirtualFs: Send + Sync {
    fn open(&self, path: &str) -> Result<FileHandle, FsError>;
}
