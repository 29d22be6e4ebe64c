//! # HTTP Server Module
//!
//! Axum server exposing the bookshop.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/`, `/isbn/:isbn`, `/author/:author`, `/title/:title` - Catalog
//! - `/async/*` - Catalog lookups behind a simulated delay
//! - `/register` - Account creation
//! - `/customer/login` - Credential issuance
//! - `/customer/auth/*` - Reviews and logout (bearer credential required)

pub mod config;
pub mod customer_routes;
pub mod error;
pub mod general_routes;
pub mod observability_routes;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, HttpServer};
pub use state::AppState;
