//! # Session Management
//!
//! Server-side table of live credentials. A protected route accepts a
//! credential only while its session is present here.
//!
//! ## Invariants
//! - Sessions expire at the credential's expiry
//! - Logout removes the session immediately
//! - Exactly one session per issued credential

use chrono::{DateTime, Utc};

use super::errors::{AuthError, AuthResult};
use super::jwt::CredentialClaims;

/// Session model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Credential id (`jti`) this session was created for
    pub id: String,

    /// User this session belongs to
    pub username: String,

    pub issued_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn from_claims(claims: &CredentialClaims) -> Self {
        Self {
            id: claims.jti.clone(),
            username: claims.sub.clone(),
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session repository trait
pub trait SessionRepository: Send + Sync {
    /// Store a new session
    fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find session by id
    fn find_by_id(&self, id: &str) -> AuthResult<Option<Session>>;

    /// Remove a session, returning it if it existed
    fn remove(&self, id: &str) -> AuthResult<Option<Session>>;

    /// Delete sessions expired as of `now`
    fn delete_expired(&self, now: DateTime<Utc>) -> AuthResult<usize>;

    /// Number of stored sessions
    fn count(&self) -> AuthResult<usize>;
}

/// In-memory session repository
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: std::sync::RwLock<Vec<Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn create(&self, session: &Session) -> AuthResult<()> {
        let mut sessions = self.sessions.write().map_err(|_| {
            AuthError::StorageError("Lock poisoned".to_string())
        })?;
        sessions.retain(|s| s.id != session.id);
        sessions.push(session.clone());
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> AuthResult<Option<Session>> {
        let sessions = self.sessions.read().map_err(|_| {
            AuthError::StorageError("Lock poisoned".to_string())
        })?;
        Ok(sessions.iter().find(|s| s.id == id).cloned())
    }

    fn remove(&self, id: &str) -> AuthResult<Option<Session>> {
        let mut sessions = self.sessions.write().map_err(|_| {
            AuthError::StorageError("Lock poisoned".to_string())
        })?;

        let position = sessions.iter().position(|s| s.id == id);
        Ok(position.map(|i| sessions.swap_remove(i)))
    }

    fn delete_expired(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        let mut sessions = self.sessions.write().map_err(|_| {
            AuthError::StorageError("Lock poisoned".to_string())
        })?;

        let len_before = sessions.len();
        sessions.retain(|s| !s.is_expired_at(now));
        Ok(len_before - sessions.len())
    }

    fn count(&self) -> AuthResult<usize> {
        let sessions = self.sessions.read().map_err(|_| {
            AuthError::StorageError("Lock poisoned".to_string())
        })?;
        Ok(sessions.len())
    }
}

/// Session manager handles session creation, lookup and removal
pub struct SessionManager<R: SessionRepository> {
    repository: R,
}

impl<R: SessionRepository> SessionManager<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Record a freshly issued credential
    ///
    /// Expired sessions are swept on the way in so the table stays bounded
    /// by the number of live logins.
    pub fn open(&self, claims: &CredentialClaims, now: DateTime<Utc>) -> AuthResult<Session> {
        self.repository.delete_expired(now)?;

        let session = Session::from_claims(claims);
        self.repository.create(&session)?;
        Ok(session)
    }

    /// Look up the live session for a verified credential
    pub fn validate(&self, claims: &CredentialClaims, now: DateTime<Utc>) -> AuthResult<Session> {
        let session = self
            .repository
            .find_by_id(&claims.jti)?
            .ok_or(AuthError::SessionInvalid)?;

        if session.username != claims.sub || session.is_expired_at(now) {
            return Err(AuthError::SessionInvalid);
        }

        Ok(session)
    }

    /// Remove the session for a credential (logout)
    pub fn close(&self, session_id: &str) -> AuthResult<Session> {
        self.repository
            .remove(session_id)?
            .ok_or(AuthError::NoActiveSession)
    }

    pub fn count(&self) -> AuthResult<usize> {
        self.repository.count()
    }
}
