//! # Book Catalog
//!
//! The read-only set of books on sale, keyed by ISBN.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CatalogError, CatalogResult};

/// A catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Catalog key
    #[serde(skip)]
    pub isbn: String,

    pub author: String,

    pub title: String,
}

impl Book {
    pub fn new(isbn: impl Into<String>, author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            author: author.into(),
            title: title.into(),
        }
    }
}

/// Immutable map of ISBN to book
///
/// Membership never changes after construction; reviews are kept
/// separately in the review store.
#[derive(Debug, Clone)]
pub struct BookCatalog {
    books: BTreeMap<String, Book>,
}

impl BookCatalog {
    /// Build a catalog from a list of books
    ///
    /// A later record with the same ISBN replaces an earlier one.
    pub fn new(books: impl IntoIterator<Item = Book>) -> Self {
        let books = books
            .into_iter()
            .map(|book| (book.isbn.clone(), book))
            .collect();
        Self { books }
    }

    /// Load a catalog from a JSON file shaped `{ "<isbn>": { "author", "title" } }`
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| CatalogError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&raw)
    }

    /// Parse a catalog from its JSON representation
    pub fn from_json(raw: &str) -> CatalogResult<Self> {
        let records: BTreeMap<String, Book> =
            serde_json::from_str(raw).map_err(|e| CatalogError::Malformed(e.to_string()))?;

        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut books = Vec::with_capacity(records.len());
        for (isbn, mut book) in records {
            if book.title.trim().is_empty() || book.author.trim().is_empty() {
                return Err(CatalogError::IncompleteRecord(isbn));
            }
            book.isbn = isbn;
            books.push(book);
        }

        Ok(Self::new(books))
    }

    /// Every book, in ISBN order
    pub fn all(&self) -> &BTreeMap<String, Book> {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.books.contains_key(isbn)
    }

    /// Exact lookup by ISBN
    pub fn by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// Books whose author contains `needle`, ignoring case
    pub fn by_author(&self, needle: &str) -> BTreeMap<String, Book> {
        self.matching(needle, |book| book.author.as_str())
    }

    /// Books whose title contains `needle`, ignoring case
    pub fn by_title(&self, needle: &str) -> BTreeMap<String, Book> {
        self.matching(needle, |book| book.title.as_str())
    }

    fn matching<F>(&self, needle: &str, field: F) -> BTreeMap<String, Book>
    where
        F: Fn(&Book) -> &str,
    {
        let needle = needle.to_lowercase();
        self.books
            .iter()
            .filter(|(_, book)| field(book).to_lowercase().contains(&needle))
            .map(|(isbn, book)| (isbn.clone(), book.clone()))
            .collect()
    }
}

impl Default for BookCatalog {
    /// The shop's built-in stock
    fn default() -> Self {
        Self::new([
            Book::new("1", "Chinua Achebe", "Things Fall Apart"),
            Book::new("2", "Hans Christian Andersen", "Fairy tales"),
            Book::new("3", "Dante Alighieri", "The Divine Comedy"),
            Book::new("4", "Unknown", "The Epic Of Gilgamesh"),
            Book::new("5", "Unknown", "The Book Of Job"),
            Book::new("6", "Unknown", "One Thousand and One Nights"),
            Book::new("7", "Unknown", "Nj\u{e1}l's Saga"),
            Book::new("8", "Jane Austen", "Pride and Prejudice"),
            Book::new("9", "Honor\u{e9} de Balzac", "Le P\u{e8}re Goriot"),
            Book::new("10", "Samuel Beckett", "Molloy, Malone Dies, The Unnamable, the trilogy"),
        ])
    }
}
