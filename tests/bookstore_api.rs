//! HTTP API Tests
//!
//! Drives the full router in-process:
//! - Catalog browsing and search
//! - Registration and login rules
//! - The credential gate on review routes
//! - Review add/modify/delete ownership

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf::auth::JwtConfig;
use bookshelf::catalog::BookCatalog;
use bookshelf::http_server::{build_router, AppState, HttpServerConfig};

// =============================================================================
// Helper Functions
// =============================================================================

fn app() -> Router {
    let state = AppState::new(
        BookCatalog::default(),
        JwtConfig::with_secret("integration_test_secret"),
    );
    build_router(&HttpServerConfig::default(), Arc::new(state))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

async fn register(app: &Router, username: &str, password: &str) -> StatusCode {
    let body = json!({ "username": username, "password": password });
    send(app, Method::POST, "/register", None, Some(body)).await.0
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let body = json!({ "username": username, "password": password });
    let (status, value) = send(app, Method::POST, "/customer/login", None, Some(body)).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", value);
    value["token"].as_str().unwrap().to_string()
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_list_all_books() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"].as_object().unwrap().len(), 10);
    assert_eq!(body["books"]["1"]["title"], "Things Fall Apart");
}

#[tokio::test]
async fn test_get_by_isbn() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/isbn/8", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["author"], "Jane Austen");
    assert_eq!(body["book"]["reviews"], json!({}));

    let (status, body) = send(&app, Method::GET, "/isbn/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_search_by_author_and_title() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/author/austen", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["books"]["8"].is_object());

    // Percent-encoded path segments are decoded before matching
    let (status, body) = send(&app, Method::GET, "/author/honor%C3%A9", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["books"]["9"].is_object());

    let (status, body) = send(&app, Method::GET, "/title/divine", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["books"]["3"].is_object());

    let (status, _) = send(&app, Method::GET, "/author/tolkien", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/title/silmarillion", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_async_lookups_match_sync_ones() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/async/books", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"].as_object().unwrap().len(), 10);

    let (status, body) = send(&app, Method::GET, "/async/isbn/1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["title"], "Things Fall Apart");

    let (status, _) = send(&app, Method::GET, "/async/isbn/0", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/async/author/achebe", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/async/title/nothing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = app();
    register(&app, "alice", "secret1").await;

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["books"], 10);
    assert_eq!(body["users"], 1);
}

// =============================================================================
// Registration and Login
// =============================================================================

#[tokio::test]
async fn test_register_twice_conflicts() {
    let app = app();

    assert_eq!(register(&app, "alice", "secret1").await, StatusCode::CREATED);
    assert_eq!(register(&app, "alice", "secret1").await, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation() {
    let app = app();

    assert_eq!(register(&app, "al", "secret1").await, StatusCode::BAD_REQUEST);
    assert_eq!(register(&app, "alice", "short").await, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username and password are required");
}

#[tokio::test]
async fn test_login_failures() {
    let app = app();
    register(&app, "alice", "secret1").await;
    login(&app, "alice", "secret1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/customer/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");

    let (status, _) = send(
        &app,
        Method::POST,
        "/customer/login",
        None,
        Some(json!({ "username": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/customer/login",
        None,
        Some(json!({ "username": "nobody", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Credential Gate
// =============================================================================

#[tokio::test]
async fn test_protected_routes_require_credential() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/customer/auth/reviews", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User not logged in");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/customer/auth/review/1?review=Great",
        Some("not.a.token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::DELETE, "/customer/auth/review/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_credential_from_other_server_rejected() {
    let other = {
        let state = AppState::new(BookCatalog::default(), JwtConfig::with_secret("another_secret"));
        build_router(&HttpServerConfig::default(), Arc::new(state))
    };
    register(&other, "alice", "secret1").await;
    let foreign = login(&other, "alice", "secret1").await;

    let app = app();
    register(&app, "alice", "secret1").await;

    let (status, _) = send(
        &app,
        Method::GET,
        "/customer/auth/reviews",
        Some(&foreign),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_scheme_is_case_insensitive() {
    let app = app();
    register(&app, "alice", "secret1").await;
    let token = login(&app, "alice", "secret1").await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/customer/auth/reviews")
        .header("authorization", format!("bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout() {
    let app = app();
    register(&app, "alice", "secret1").await;
    let token = login(&app, "alice", "secret1").await;

    let (status, body) = send(&app, Method::DELETE, "/customer/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    // The credential is still correctly signed but no longer has a session
    let (status, _) = send(&app, Method::GET, "/customer/auth/reviews", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::DELETE, "/customer/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No active session found");

    let (status, _) = send(&app, Method::DELETE, "/customer/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Reviews
// =============================================================================

#[tokio::test]
async fn test_review_lifecycle() {
    let app = app();

    assert_eq!(register(&app, "alice", "secret1").await, StatusCode::CREATED);
    let token = login(&app, "alice", "secret1").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/customer/auth/review/1?review=Great!",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "added");
    assert_eq!(body["message"], "Review added successfully");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/customer/auth/review/1?review=Even%20better",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "modified");
    assert_eq!(body["review"], "Even better");

    let (_, body) = send(&app, Method::GET, "/isbn/1", None, None).await;
    assert_eq!(body["book"]["reviews"]["alice"], "Even better");

    let (status, _) = send(&app, Method::DELETE, "/customer/auth/review/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::DELETE, "/customer/auth/review/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No review found for this user");
}

#[tokio::test]
async fn test_review_validation() {
    let app = app();
    register(&app, "alice", "secret1").await;
    let token = login(&app, "alice", "secret1").await;

    let (status, body) = send(&app, Method::PUT, "/customer/auth/review/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Review text is required");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/customer/auth/review/1?review=",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/customer/auth/review/999?review=Great",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");

    let (status, _) = send(&app, Method::DELETE, "/customer/auth/review/999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviews_are_owned_by_their_author() {
    let app = app();
    register(&app, "alice", "secret1").await;
    register(&app, "bobby", "secret2").await;
    let alice = login(&app, "alice", "secret1").await;
    let bobby = login(&app, "bobby", "secret2").await;

    send(&app, Method::PUT, "/customer/auth/review/2?review=Charming", Some(&alice), None).await;

    // Bobby cannot delete Alice's review
    let (status, _) = send(&app, Method::DELETE, "/customer/auth/review/2", Some(&bobby), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bobby's own review sits beside Alice's
    let (_, body) = send(&app, Method::PUT, "/customer/auth/review/2?review=Dull", Some(&bobby), None).await;
    assert_eq!(body["outcome"], "added");

    let (_, body) = send(&app, Method::GET, "/isbn/2", None, None).await;
    assert_eq!(body["book"]["reviews"]["alice"], "Charming");
    assert_eq!(body["book"]["reviews"]["bobby"], "Dull");
}

#[tokio::test]
async fn test_list_own_reviews() {
    let app = app();
    register(&app, "alice", "secret1").await;
    let token = login(&app, "alice", "secret1").await;

    send(&app, Method::PUT, "/customer/auth/review/8?review=Witty", Some(&token), None).await;
    send(&app, Method::PUT, "/customer/auth/review/3?review=Epic", Some(&token), None).await;

    let (status, body) = send(&app, Method::GET, "/customer/auth/reviews", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    let reviews = body["reviews"].as_object().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(body["reviews"]["8"]["title"], "Pride and Prejudice");
    assert_eq!(body["reviews"]["8"]["review"], "Witty");
    assert_eq!(body["reviews"]["3"]["author"], "Dante Alighieri");
}
