//! # Catalog Errors
//!
//! Errors raised while loading a book catalog.

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("Failed to read catalog {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// Catalog file is not valid JSON of the expected shape
    #[error("Malformed catalog: {0}")]
    Malformed(String),

    /// A catalog must contain at least one book
    #[error("Catalog contains no books")]
    Empty,

    /// A record is missing its title or author
    #[error("Book {0} has an empty title or author")]
    IncompleteRecord(String),
}
