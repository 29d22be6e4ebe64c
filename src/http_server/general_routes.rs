//! Public HTTP Routes
//!
//! Catalog browsing and registration. None of these require a credential.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Serialize;

use super::error::ApiError;
use super::state::AppState;
use crate::auth::RegisterRequest;
use crate::catalog::Book;

/// Public routes with shared state
pub fn general_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_books_handler))
        .route("/isbn/:isbn", get(isbn_handler))
        .route("/author/:author", get(author_handler))
        .route("/title/:title", get(title_handler))
        .route("/register", post(register_handler))
        .route("/async/books", get(async_list_books_handler))
        .route("/async/isbn/:isbn", get(async_isbn_handler))
        .route("/async/author/:author", get(async_author_handler))
        .route("/async/title/:title", get(async_title_handler))
        .with_state(state)
}

// ==================
// Response Types
// ==================

/// A book as shown to clients, with its reviews
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub isbn: String,
    pub author: String,
    pub title: String,
    pub reviews: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub message: String,
    pub books: BTreeMap<String, BookResponse>,
}

#[derive(Debug, Serialize)]
pub struct SingleBookResponse {
    pub message: String,
    pub book: BookResponse,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub username: String,
}

fn render(state: &AppState, book: &Book) -> Result<BookResponse, ApiError> {
    Ok(BookResponse {
        isbn: book.isbn.clone(),
        author: book.author.clone(),
        title: book.title.clone(),
        reviews: state.reviews.reviews_for(&book.isbn)?,
    })
}

fn render_all<'a>(
    state: &AppState,
    books: impl IntoIterator<Item = &'a Book>,
) -> Result<BTreeMap<String, BookResponse>, ApiError> {
    books
        .into_iter()
        .map(|book| Ok((book.isbn.clone(), render(state, book)?)))
        .collect()
}

// ==================
// Lookups
// ==================

fn list_books(state: &AppState) -> Result<Json<BookListResponse>, ApiError> {
    Ok(Json(BookListResponse {
        message: "Books retrieved successfully".to_string(),
        books: render_all(state, state.catalog.all().values())?,
    }))
}

fn find_by_isbn(state: &AppState, isbn: &str) -> Result<Json<SingleBookResponse>, ApiError> {
    let book = state
        .catalog
        .by_isbn(isbn)
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    Ok(Json(SingleBookResponse {
        message: "Book retrieved successfully".to_string(),
        book: render(state, book)?,
    }))
}

fn find_by_author(state: &AppState, author: &str) -> Result<Json<BookListResponse>, ApiError> {
    let found = state.catalog.by_author(author);
    if found.is_empty() {
        return Err(ApiError::NotFound("No books found by this author".to_string()));
    }

    Ok(Json(BookListResponse {
        message: "Books by author retrieved successfully".to_string(),
        books: render_all(state, found.values())?,
    }))
}

fn find_by_title(state: &AppState, title: &str) -> Result<Json<BookListResponse>, ApiError> {
    let found = state.catalog.by_title(title);
    if found.is_empty() {
        return Err(ApiError::NotFound("No books found with this title".to_string()));
    }

    Ok(Json(BookListResponse {
        message: "Books by title retrieved successfully".to_string(),
        books: render_all(state, found.values())?,
    }))
}

// ==================
// Handlers
// ==================

async fn list_books_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookListResponse>, ApiError> {
    list_books(&state)
}

async fn isbn_handler(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<Json<SingleBookResponse>, ApiError> {
    find_by_isbn(&state, &isbn)
}

async fn author_handler(
    State(state): State<Arc<AppState>>,
    Path(author): Path<String>,
) -> Result<Json<BookListResponse>, ApiError> {
    find_by_author(&state, &author)
}

async fn title_handler(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Json<BookListResponse>, ApiError> {
    find_by_title(&state, &title)
}

/// Registration handler
async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state.auth.register(request)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            username: user.username,
        }),
    ))
}

// The `/async/*` variants answer the same lookups after a simulated
// backend delay.

async fn async_list_books_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookListResponse>, ApiError> {
    tokio::time::sleep(state.lookup_delay).await;
    list_books(&state)
}

async fn async_isbn_handler(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<Json<SingleBookResponse>, ApiError> {
    tokio::time::sleep(state.lookup_delay).await;
    find_by_isbn(&state, &isbn)
}

async fn async_author_handler(
    State(state): State<Arc<AppState>>,
    Path(author): Path<String>,
) -> Result<Json<BookListResponse>, ApiError> {
    tokio::time::sleep(state.lookup_delay).await;
    find_by_author(&state, &author)
}

async fn async_title_handler(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Json<BookListResponse>, ApiError> {
    tokio::time::sleep(state.lookup_delay).await;
    find_by_title(&state, &title)
}
