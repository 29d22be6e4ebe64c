//! # Reviews Module
//!
//! Customer reviews, at most one per user per book.

pub mod errors;
pub mod store;

pub use errors::{ReviewError, ReviewResult};
pub use store::{Outcome, ReviewStore, UserReview};
