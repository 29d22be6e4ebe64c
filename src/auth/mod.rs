//! # Auth Module
//!
//! User registration, login credentials and the session gate in front of
//! the review routes.

pub mod api;
pub mod errors;
pub mod jwt;
pub mod session;
pub mod user;

pub use api::AuthService;
pub use errors::{AuthError, AuthResult};
pub use jwt::{Credential, CredentialClaims, JwtConfig, JwtManager};
pub use session::{InMemorySessionRepository, Session, SessionManager, SessionRepository};
pub use user::{
    InMemoryUserRepository, LoginRequest, RegisterRequest, User, UserDirectory, UserRepository,
};
