//! In-memory file tree
//!
//! Holds every file's bytes and metadata in a sorted map. A tree is filled
//! once, either from a directory snapshot or by inserting entries, and then
//! shared read-only.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use hyper::body::Bytes;

use super::{FileHandle, FsError, VirtualFs};

#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    files: BTreeMap<String, FileHandle>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every regular file below `root` into memory.
    ///
    /// Keys are paths relative to `root` joined with `/`. Entries whose names
    /// are not valid UTF-8, dangling symlinks and special files are skipped
    /// with a warning.
    pub fn from_dir(root: impl AsRef<Path>) -> Result<Self, FsError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(FsError::NotFound(root.display().to_string()));
        }

        let mut tree = Self::new();
        tree.load_dir(root, "", &mut Vec::new())?;
        tracing::info!(
            root = %root.display(),
            files = tree.len(),
            "Loaded static files into memory"
        );
        Ok(tree)
    }

    /// Symlinks are followed. `ancestors` holds the canonical directories on
    /// the current walk so a link back up the tree is not descended twice.
    fn load_dir(
        &mut self,
        dir: &Path,
        prefix: &str,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<(), FsError> {
        let canonical = fs::canonicalize(dir)?;
        if ancestors.contains(&canonical) {
            tracing::warn!(path = %dir.display(), "Skipping symlinked directory cycle");
            return Ok(());
        }
        ancestors.push(canonical);

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = entry.file_name().to_str().map(ToString::to_string) else {
                tracing::warn!(path = %path.display(), "Skipping non UTF-8 file name");
                continue;
            };
            let key = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };

            // fs::metadata follows symlinks
            let Ok(metadata) = fs::metadata(&path) else {
                tracing::warn!(path = %path.display(), "Skipping dangling symlink");
                continue;
            };
            if metadata.is_dir() {
                self.load_dir(&path, &key, ancestors)?;
            } else if metadata.is_file() {
                let data = fs::read(&path)?;
                self.insert(&key, data, DateTime::<Utc>::from(metadata.modified()?));
            } else {
                tracing::warn!(path = %path.display(), "Skipping special file");
            }
        }

        ancestors.pop();
        Ok(())
    }

    /// Add or replace a file. Leading and trailing slashes are ignored.
    pub fn insert(&mut self, path: &str, data: impl Into<Bytes>, modified: DateTime<Utc>) {
        let key = path.trim_matches('/').to_string();
        let handle = FileHandle::new(key.clone(), data, modified);
        self.files.insert(key, handle);
    }

    /// Builder-style [`insert`](Self::insert)
    #[must_use]
    pub fn with_file(mut self, path: &str, data: impl Into<Bytes>, modified: DateTime<Utc>) -> Self {
        self.insert(path, data, modified);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    fn is_dir(&self, path: &str) -> bool {
        if path.is_empty() {
            return true;
        }
        let dir_prefix = format!("{path}/");
        self.files
            .range(dir_prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&dir_prefix))
    }
}

impl VirtualFs for MemoryFs {
    fn open(&self, path: &str) -> Result<FileHandle, FsError> {
        if let Some(file) = self.files.get(path) {
            return Ok(file.clone());
        }
        if self.is_dir(path) {
            return Err(FsError::IsDirectory(path.to_string()));
        }
        Err(FsError::NotFound(path.to_string()))
    }
}
