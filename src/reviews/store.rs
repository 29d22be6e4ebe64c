//! # Review Store
//!
//! Per-book reviews keyed by username.
//!
//! ## Invariants
//! - At most one review per (book, user)
//! - Reviews only exist for books in the catalog
//! - Review text is never empty

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use serde::Serialize;

use super::errors::{ReviewError, ReviewResult};
use crate::catalog::BookCatalog;

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The user had no review of this book before
    Added,
    /// The user's previous review was replaced
    Modified,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Added => "Review added successfully",
            Outcome::Modified => "Review modified successfully",
        }
    }
}

/// One of a user's reviews, joined with its book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserReview {
    #[serde(skip)]
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub review: String,
}

/// Reviews for every book, guarded by a single lock
pub struct ReviewStore {
    catalog: Arc<BookCatalog>,
    reviews: RwLock<HashMap<String, BTreeMap<String, String>>>,
}

impl ReviewStore {
    pub fn new(catalog: Arc<BookCatalog>) -> Self {
        Self {
            catalog,
            reviews: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &BookCatalog {
        &self.catalog
    }

    /// Add or replace `username`'s review of `isbn`
    pub fn upsert(&self, isbn: &str, username: &str, text: &str) -> ReviewResult<Outcome> {
        if text.is_empty() {
            return Err(ReviewError::EmptyText);
        }

        if !self.catalog.contains(isbn) {
            return Err(ReviewError::BookNotFound);
        }

        let mut reviews = self.reviews.write().map_err(|_| {
            ReviewError::StorageError("Lock poisoned".to_string())
        })?;

        let previous = reviews
            .entry(isbn.to_string())
            .or_default()
            .insert(username.to_string(), text.to_string());

        Ok(match previous {
            Some(_) => Outcome::Modified,
            None => Outcome::Added,
        })
    }

    /// Delete `username`'s review of `isbn`
    pub fn remove(&self, isbn: &str, username: &str) -> ReviewResult<()> {
        if !self.catalog.contains(isbn) {
            return Err(ReviewError::BookNotFound);
        }

        let mut reviews = self.reviews.write().map_err(|_| {
            ReviewError::StorageError("Lock poisoned".to_string())
        })?;

        let book_reviews = reviews.get_mut(isbn).ok_or(ReviewError::ReviewNotFound)?;
        book_reviews
            .remove(username)
            .ok_or(ReviewError::ReviewNotFound)?;

        if book_reviews.is_empty() {
            reviews.remove(isbn);
        }

        Ok(())
    }

    /// All reviews of one book, by username
    pub fn reviews_for(&self, isbn: &str) -> ReviewResult<BTreeMap<String, String>> {
        let reviews = self.reviews.read().map_err(|_| {
            ReviewError::StorageError("Lock poisoned".to_string())
        })?;
        Ok(reviews.get(isbn).cloned().unwrap_or_default())
    }

    /// Every review written by `username`, in ISBN order
    pub fn list_by_user(&self, username: &str) -> ReviewResult<Vec<UserReview>> {
        let reviews = self.reviews.read().map_err(|_| {
            ReviewError::StorageError("Lock poisoned".to_string())
        })?;

        let found = self
            .catalog
            .all()
            .iter()
            .filter_map(|(isbn, book)| {
                let text = reviews.get(isbn)?.get(username)?;
                Some(UserReview {
                    isbn: isbn.clone(),
                    title: book.title.clone(),
                    author: book.author.clone(),
                    review: text.clone(),
                })
            })
            .collect();

        Ok(found)
    }
}
