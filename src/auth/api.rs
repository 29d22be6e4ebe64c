//! # Auth Service
//!
//! Registration, login, the protected-route gate and logout, combining the
//! user directory, credential signing and the session table.

use chrono::{DateTime, Utc};

use super::errors::{AuthError, AuthResult};
use super::jwt::{Credential, JwtConfig, JwtManager};
use super::session::{SessionManager, SessionRepository};
use super::user::{LoginRequest, RegisterRequest, User, UserDirectory, UserRepository};

/// Auth service combining all auth components
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    users: UserDirectory<U>,
    sessions: SessionManager<S>,
    jwt_manager: JwtManager,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(user_repo: U, session_repo: S, jwt_config: JwtConfig) -> Self {
        Self {
            users: UserDirectory::new(user_repo),
            sessions: SessionManager::new(session_repo),
            jwt_manager: JwtManager::new(jwt_config),
        }
    }

    pub fn users(&self) -> &UserDirectory<U> {
        &self.users
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt_manager
    }

    /// Register a new user
    pub fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        let username = request.username.unwrap_or_default();
        let password = request.password.unwrap_or_default();

        let user = self.users.register(&username, &password)?;
        tracing::info!(username = %user.username, "user registered");
        Ok(user)
    }

    /// Authenticate a user and open a session for the issued credential
    pub fn login(&self, request: LoginRequest) -> AuthResult<Credential> {
        self.login_at(request, Utc::now())
    }

    pub fn login_at(&self, request: LoginRequest, now: DateTime<Utc>) -> AuthResult<Credential> {
        let (username, password) = match (request.username, request.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
            _ => {
                return Err(AuthError::InvalidInput(
                    "Username and password are required".to_string(),
                ))
            }
        };

        if !self.users.authenticate(&username, &password)? {
            tracing::warn!(username = %username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let credential = self.jwt_manager.issue_at(&username, now)?;
        self.sessions.open(&credential.claims, now)?;

        tracing::info!(
            username = %username,
            expires_at = %credential.claims.expires_at(),
            "user logged in"
        );
        Ok(credential)
    }

    /// Stateless check of a credential: signature and expiry only
    pub fn verify(&self, token: &str) -> AuthResult<String> {
        self.jwt_manager.verify(token).map(|claims| claims.sub)
    }

    /// Gate for protected routes
    ///
    /// Requires a credential with a valid signature, a live session for it,
    /// and a subject that is still a registered user. Returns the username.
    pub fn authorize(&self, token: Option<&str>) -> AuthResult<String> {
        self.authorize_at(token, Utc::now())
    }

    pub fn authorize_at(&self, token: Option<&str>, now: DateTime<Utc>) -> AuthResult<String> {
        let token = token.ok_or(AuthError::NotLoggedIn)?;

        let claims = self.jwt_manager.verify_at(token, now).map_err(|e| {
            tracing::debug!(error = %e, "credential rejected");
            match e {
                AuthError::StorageError(_) => e,
                _ => AuthError::SessionInvalid,
            }
        })?;

        self.sessions.validate(&claims, now)?;

        if !self.users.is_registered(&claims.sub)? {
            return Err(AuthError::SessionInvalid);
        }

        Ok(claims.sub)
    }

    /// Close the session belonging to a credential
    pub fn logout(&self, token: Option<&str>) -> AuthResult<String> {
        let token = token.ok_or(AuthError::NoActiveSession)?;
        let claims = self
            .jwt_manager
            .verify(token)
            .map_err(|_| AuthError::NoActiveSession)?;

        let session = self.sessions.close(&claims.jti)?;
        tracing::info!(username = %session.username, "user logged out");
        Ok(session.username)
    }

    /// Number of live sessions
    pub fn session_count(&self) -> AuthResult<usize> {
        self.sessions.count()
    }
}
