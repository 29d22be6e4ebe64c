//! # User Directory
//!
//! Registered shop customers, keyed by username.
//!
//! Passwords are kept as given; hashing is out of scope for this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use super::errors::{AuthError, AuthResult};

/// Minimum username length, in characters
pub const MIN_USERNAME_LEN: usize = 3;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// User model
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique login name
    pub username: String,

    #[serde(skip_serializing)]
    pub password: String,

    /// When the user registered
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user after checking the field length rules
    pub fn new(username: String, password: String) -> AuthResult<Self> {
        validate_registration(&username, &password)?;

        Ok(Self {
            username,
            password,
            created_at: Utc::now(),
        })
    }

    /// Compare a candidate password in constant time
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

/// Check the presence and length rules for a new account
pub fn validate_registration(username: &str, password: &str) -> AuthResult<()> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }

    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AuthError::InvalidInput(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_LEN
        )));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidInput(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(())
}

/// Registration request body
///
/// Fields are optional so a missing field maps to a 400 rather than a
/// body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

impl RegisterRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// User repository trait
///
/// Abstracts storage operations for users.
pub trait UserRepository: Send + Sync {
    /// Find a user by username
    fn find_by_username(&self, username: &str) -> AuthResult<Option<User>>;

    /// Check if a username is already registered
    fn exists(&self, username: &str) -> AuthResult<bool>;

    /// Store a new user, failing if the username is taken
    fn create(&self, user: &User) -> AuthResult<()>;

    /// Number of registered users
    fn count(&self) -> AuthResult<usize>;
}

/// In-memory user repository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: std::sync::RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_by_username(&self, username: &str) -> AuthResult<Option<User>> {
        let users = self.users.read().map_err(|_| {
            AuthError::StorageError("Lock poisoned".to_string())
        })?;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    fn exists(&self, username: &str) -> AuthResult<bool> {
        let users = self.users.read().map_err(|_| {
            AuthError::StorageError("Lock poisoned".to_string())
        })?;
        Ok(users.iter().any(|u| u.username == username))
    }

    fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().map_err(|_| {
            AuthError::StorageError("Lock poisoned".to_string())
        })?;

        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::UsernameTaken);
        }

        users.push(user.clone());
        Ok(())
    }

    fn count(&self) -> AuthResult<usize> {
        let users = self.users.read().map_err(|_| {
            AuthError::StorageError("Lock poisoned".to_string())
        })?;
        Ok(users.len())
    }
}

/// Registration and password checks over a [`UserRepository`]
pub struct UserDirectory<R: UserRepository> {
    repository: R,
}

impl<R: UserRepository> UserDirectory<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Register a new user
    pub fn register(&self, username: &str, password: &str) -> AuthResult<User> {
        let user = User::new(username.to_string(), password.to_string())?;
        self.repository.create(&user)?;
        Ok(user)
    }

    /// True iff a stored user matches both fields exactly
    pub fn authenticate(&self, username: &str, password: &str) -> AuthResult<bool> {
        Ok(self
            .repository
            .find_by_username(username)?
            .map(|user| user.password_matches(password))
            .unwrap_or(false))
    }

    pub fn is_registered(&self, username: &str) -> AuthResult<bool> {
        self.repository.exists(username)
    }

    pub fn count(&self) -> AuthResult<usize> {
        self.repository.count()
    }
}
