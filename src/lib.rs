//! Bookshelf - a file-backed book tracker served over HTTP.
//!
//! Users add, edit, delete, list, and export book records through
//! plain HTML forms. The whole collection lives in one JSON file and
//! is reloaded on every request; there is no database and no
//! in-memory state between requests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   HTTP API                       │
//! │  /  /edit/:id  /delete/:id  /export              │
//! └───────────────────────┬─────────────────────────┘
//!                         │ load / mutate / save
//! ┌───────────────────────┴─────────────────────────┐
//! │                  BookStore                       │
//! │  one JSON file, atomic rename-on-write           │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Mutating requests take a write lock around their load-mutate-save
//! cycle, so requests within one process never drop each other's
//! updates. Multiple processes on the same file remain unguarded.

/// Book record type.
pub mod book;

/// File-backed record store.
pub mod store;

/// CSV export.
pub mod export;

/// HTTP API.
pub mod api;

pub use book::Book;
pub use export::{export_csv, ExportError};
pub use store::{BookStore, StoreError};
