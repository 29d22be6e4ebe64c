//! Customer HTTP Routes
//!
//! Login, review management and logout. Everything under `/auth` requires
//! `Authorization: Bearer <token>` with a token obtained from `/login`.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::HeaderMap,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::state::AppState;
use crate::auth::LoginRequest;
use crate::reviews::{Outcome, UserReview};

/// Customer routes with shared state
pub fn customer_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route(
            "/auth/review/:isbn",
            put(put_review_handler).delete(delete_review_handler),
        )
        .route("/auth/reviews", get(list_reviews_handler))
        .route("/auth/logout", delete(logout_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub token_type: String,
    pub username: String,
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    #[serde(default)]
    pub review: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub message: String,
    pub isbn: String,
    pub username: String,
    pub review: String,
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
pub struct DeleteReviewResponse {
    pub message: String,
    pub isbn: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct UserReviewsResponse {
    pub message: String,
    pub username: String,
    pub reviews: BTreeMap<String, UserReview>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
    pub username: String,
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
}

/// Resolve the caller of a protected route, or reject with 401
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    Ok(state.auth.authorize(bearer_token(headers))?)
}

// ==================
// Handlers
// ==================

/// Login handler
async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credential = state.auth.login(request)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: credential.token,
        token_type: "bearer".to_string(),
        username: credential.claims.sub.clone(),
        expires_at: credential.claims.expires_at().to_rfc3339(),
    }))
}

/// Add or modify the caller's review of a book
async fn put_review_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(isbn): Path<String>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let username = authorize(&state, &headers)?;
    let review = query.review.unwrap_or_default();

    let outcome = state.reviews.upsert(&isbn, &username, &review)?;
    tracing::info!(isbn = %isbn, username = %username, ?outcome, "review saved");

    Ok(Json(ReviewResponse {
        message: outcome.message().to_string(),
        isbn,
        username,
        review,
        outcome,
    }))
}

/// Delete the caller's review of a book
async fn delete_review_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(isbn): Path<String>,
) -> Result<Json<DeleteReviewResponse>, ApiError> {
    let username = authorize(&state, &headers)?;

    state.reviews.remove(&isbn, &username)?;
    tracing::info!(isbn = %isbn, username = %username, "review deleted");

    Ok(Json(DeleteReviewResponse {
        message: "Review deleted successfully".to_string(),
        isbn,
        username,
    }))
}

/// List every review written by the caller
async fn list_reviews_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserReviewsResponse>, ApiError> {
    let username = authorize(&state, &headers)?;

    let reviews = state
        .reviews
        .list_by_user(&username)?
        .into_iter()
        .map(|review| (review.isbn.clone(), review))
        .collect();

    Ok(Json(UserReviewsResponse {
        message: "User reviews retrieved successfully".to_string(),
        username,
        reviews,
    }))
}

/// Logout handler
async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let username = state.auth.logout(bearer_token(&headers))?;

    Ok(Json(LogoutResponse {
        message: "Logout successful".to_string(),
        username,
    }))
}
