//! API request handlers.

pub mod books;
pub mod export;
