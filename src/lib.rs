//! bookshelf - a small online bookstore API
//!
//! Browse a fixed catalog, register, log in, and keep one review per book.

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod http_server;
pub mod reviews;
