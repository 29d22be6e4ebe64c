//! Configuration file
//!
//! A JSON object; every field is optional. Server fields sit at the top
//! level next to the auth and catalog settings:
//!
//! ```json
//! { "port": 5000, "token_ttl_secs": 3600, "catalog_path": "books.json" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::auth::jwt::MAX_TOKEN_TTL_SECS;
use crate::auth::JwtConfig;
use crate::catalog::BookCatalog;
use crate::http_server::HttpServerConfig;

/// Config file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./bookshelf.json";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub server: HttpServerConfig,

    /// Credential signing secret; `BOOKSHELF_JWT_SECRET` takes precedence
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Credential lifetime in seconds (default 3600)
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    /// JSON catalog to serve instead of the built-in stock
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Log filter directive, overridden by `RUST_LOG` (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_token_ttl_secs() -> i64 {
    crate::auth::jwt::DEFAULT_TOKEN_TTL_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            jwt_secret: None,
            token_ttl_secs: default_token_ttl_secs(),
            catalog_path: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load an explicit path, or the default path if it exists, or defaults
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.token_ttl_secs <= 0 {
            return Err(CliError::config_error("token_ttl_secs must be > 0"));
        }

        if self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(CliError::config_error(format!(
                "token_ttl_secs must be at most {} (365 days)",
                MAX_TOKEN_TTL_SECS
            )));
        }

        if matches!(self.jwt_secret.as_deref(), Some(s) if s.trim().is_empty()) {
            return Err(CliError::config_error("jwt_secret must not be empty"));
        }

        if self.server.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        Ok(())
    }

    /// Apply a secret from the command line or environment
    pub fn with_secret_override(mut self, secret: Option<String>) -> Self {
        if let Some(secret) = secret.filter(|s| !s.trim().is_empty()) {
            self.jwt_secret = Some(secret);
        }
        self
    }

    /// Build the credential configuration
    ///
    /// There is no built-in secret: one must come from the file, the
    /// command line or `BOOKSHELF_JWT_SECRET`.
    pub fn jwt_config(&self) -> CliResult<JwtConfig> {
        self.validate()?;

        let secret = self.jwt_secret.clone().ok_or_else(|| {
            CliError::config_error(
                "No signing secret configured. Set BOOKSHELF_JWT_SECRET or jwt_secret.",
            )
        })?;

        Ok(JwtConfig::with_secret(secret).ttl(Duration::seconds(self.token_ttl_secs)))
    }

    /// Load the configured catalog, or the built-in one
    pub fn catalog(&self) -> CliResult<BookCatalog> {
        match &self.catalog_path {
            Some(path) => BookCatalog::load(path)
                .map_err(|e| CliError::config_error(e.to_string())),
            None => Ok(BookCatalog::default()),
        }
    }
}
