//! # Credential Signing
//!
//! Login credentials are HS256 JSON Web Tokens binding a username.
//!
//! ## Invariants
//! - A credential is valid from issuance until `exp`, exclusive
//! - Verification is stateless: signature, issuer, audience and expiry only
//! - No secrets in the token

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{AuthError, AuthResult};

/// Default credential lifetime
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Longest credential lifetime a configuration may ask for
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// JWT claims carried by a credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    /// Subject (username)
    pub sub: String,

    /// Unique credential id, doubles as the session id
    pub jti: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,

    pub iss: String,

    pub aud: String,
}

impl CredentialClaims {
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }
}

/// A signed credential together with its decoded claims
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: String,
    pub claims: CredentialClaims,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret
    pub secret: String,

    /// Credential lifetime
    pub token_ttl: Duration,

    pub issuer: String,

    pub audience: String,
}

impl JwtConfig {
    /// Configuration with the given secret and default lifetime
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            issuer: "bookshelf".to_string(),
            audience: "bookshelf".to_string(),
        }
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}

/// Issues and verifies credentials with a process-wide secret
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.config.token_ttl
    }

    /// Issue a credential for `username`, valid for the configured TTL
    pub fn issue(&self, username: &str) -> AuthResult<Credential> {
        self.issue_at(username, Utc::now())
    }

    /// Issue a credential as if the current time were `now`
    pub fn issue_at(&self, username: &str, now: DateTime<Utc>) -> AuthResult<Credential> {
        let expires_at = now
            .checked_add_signed(self.config.token_ttl)
            .ok_or(AuthError::TokenGenerationFailed)?;

        let claims = CredentialClaims {
            sub: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)?;

        Ok(Credential { token, claims })
    }

    /// Verify a credential against the current time
    pub fn verify(&self, token: &str) -> AuthResult<CredentialClaims> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature, issuer and audience, then check expiry against `now`
    ///
    /// Expiry is checked here rather than by `jsonwebtoken` so that the
    /// validity window has no leeway and can be tested deterministically.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<CredentialClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data =
            decode::<CredentialClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            })?;

        let claims = token_data.claims;
        if now.timestamp() >= claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}
