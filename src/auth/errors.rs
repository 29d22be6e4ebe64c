//! # Auth Errors
//!
//! Error types for the authentication module.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and registration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    // ==================
    // Registration Errors
    // ==================

    /// Username or password missing, or too short
    #[error("{0}")]
    InvalidInput(String),

    /// Username already registered
    #[error("User already exists")]
    UsernameTaken,

    // ==================
    // Login / Session Errors
    // ==================

    /// Username/password pair does not match a registered user
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No credential was presented on a protected route
    #[error("User not logged in")]
    NotLoggedIn,

    /// Credential is well-formed but has no live server-side session
    #[error("User not authenticated")]
    SessionInvalid,

    /// Logout was requested without a live session
    #[error("No active session found")]
    NoActiveSession,

    // ==================
    // Credential Errors
    // ==================

    /// Credential could not be decoded
    #[error("Malformed token")]
    MalformedToken,

    /// Credential has passed its expiry
    #[error("Token expired")]
    TokenExpired,

    /// Credential signature does not match the server secret
    #[error("Invalid token signature")]
    InvalidSignature,

    // ==================
    // Internal Errors
    // ==================

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            AuthError::InvalidInput(_) => 400,
            AuthError::NoActiveSession => 400,

            // 401 Unauthorized
            AuthError::InvalidCredentials => 401,
            AuthError::NotLoggedIn => 401,
            AuthError::SessionInvalid => 401,
            AuthError::MalformedToken => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,

            // 409 Conflict
            AuthError::UsernameTaken => 409,

            // 500 Internal Server Error
            AuthError::TokenGenerationFailed => 500,
            AuthError::StorageError(_) => 500,
        }
    }

    /// Returns whether this error was caused by the client
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
