//! # Review Errors

use thiserror::Error;

/// Result type for review operations
pub type ReviewResult<T> = Result<T, ReviewError>;

/// Review store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Book not found")]
    BookNotFound,

    #[error("No review found for this user")]
    ReviewNotFound,

    #[error("Review text is required")]
    EmptyText,

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ReviewError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ReviewError::EmptyText => 400,
            ReviewError::BookNotFound => 404,
            ReviewError::ReviewNotFound => 404,
            ReviewError::StorageError(_) => 500,
        }
    }
}
