//! Book record type and form-input normalization.

use serde::{Deserialize, Serialize};

/// A single tracked book.
///
/// All four fields default to the empty string when deserializing, so
/// records written by older versions of the app (title/author only)
/// load without complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Book title.
    #[serde(default)]
    pub title: String,

    /// Author name.
    #[serde(default)]
    pub author: String,

    /// Genre, empty when unset.
    #[serde(default)]
    pub genre: String,

    /// Reading status, empty when unset.
    #[serde(default)]
    pub status: String,
}

impl Book {
    /// Strip surrounding whitespace from every field.
    ///
    /// Form input arrives untrimmed; both the create and edit paths
    /// normalize through here so the stored record never carries
    /// accidental padding.
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            genre: self.genre.trim().to_string(),
            status: self.status.trim().to_string(),
        }
    }
}
