//! CSV export of the book collection.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::book::Book;

/// Column order of the exported CSV.
pub const CSV_COLUMNS: [&str; 4] = ["title", "author", "genre", "status"];

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("nothing to export")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the collection to `path` as CSV, one header row plus one row
/// per record in collection order. Overwrites any existing file.
///
/// An empty collection is an error and leaves any prior file untouched.
pub fn export_csv(books: &[Book], path: &Path) -> Result<(), ExportError> {
    if books.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_COLUMNS)?;
    for book in books {
        writer.write_record([&book.title, &book.author, &book.genre, &book.status])?;
    }
    writer.flush()?;

    debug!(path = %path.display(), count = books.len(), "collection exported");
    Ok(())
}
