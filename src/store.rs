//! File-backed record store.
//!
//! The whole collection lives in one JSON file. Every load reads and
//! parses the full file; every save rewrites it through a temporary
//! file in the same directory followed by an atomic rename, so a crash
//! mid-save never leaves a half-written store behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::book::Book;

/// Errors that can occur in store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed store file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persistent store for the book collection.
///
/// Holds only the file path. No collection state survives between
/// calls, so each request sees whatever is on disk at that moment.
pub struct BookStore {
    path: PathBuf,
}

impl BookStore {
    /// Bind a store to a JSON file path. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection from disk.
    ///
    /// A missing file is an empty collection. A file that exists but
    /// cannot be read or parsed is an error: treating a corrupt file
    /// as empty would let the next save destroy it.
    pub fn load(&self) -> Result<Vec<Book>, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "store file absent, starting empty");
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        let books = serde_json::from_str(&raw)?;
        Ok(books)
    }

    /// Write the full collection to disk, replacing prior contents.
    ///
    /// Serializes as pretty-printed JSON with 4-space indentation to
    /// stay byte-compatible with files written by earlier versions of
    /// the app.
    pub fn save(&self, books: &[Book]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        books.serialize(&mut serializer)?;

        // Temp file must live in the target directory so the rename
        // stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&buf)?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), count = books.len(), "collection saved");
        Ok(())
    }
}
