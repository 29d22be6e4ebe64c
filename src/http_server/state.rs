//! Shared application state
//!
//! One instance per server, handed to every handler through axum `State`.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthService, InMemorySessionRepository, InMemoryUserRepository, JwtConfig};
use crate::catalog::BookCatalog;
use crate::reviews::ReviewStore;

/// Auth service over the in-memory repositories
pub type ShopAuth = AuthService<InMemoryUserRepository, InMemorySessionRepository>;

/// Users, sessions, catalog and reviews for one running shop
pub struct AppState {
    pub auth: ShopAuth,
    pub catalog: Arc<BookCatalog>,
    pub reviews: ReviewStore,
    pub lookup_delay: Duration,
}

impl AppState {
    pub fn new(catalog: BookCatalog, jwt_config: JwtConfig) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            auth: AuthService::new(
                InMemoryUserRepository::new(),
                InMemorySessionRepository::new(),
                jwt_config,
            ),
            reviews: ReviewStore::new(catalog.clone()),
            catalog,
            lookup_delay: Duration::ZERO,
        }
    }

    /// Set the delay used by the `/async/*` lookups
    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = delay;
        self
    }
}
