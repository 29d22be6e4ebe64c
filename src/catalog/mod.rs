//! # Catalog Module
//!
//! Static, read-only book inventory with lookups by ISBN, author and title.

pub mod book;
pub mod errors;

pub use book::{Book, BookCatalog};
pub use errors::{CatalogError, CatalogResult};
