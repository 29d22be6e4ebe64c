//! CLI command implementations

use std::path::Path;

use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::http_server::HttpServer;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            host,
            port,
            jwt_secret,
        } => serve(config.as_deref(), host, port, jwt_secret),
        Command::Check { config, jwt_secret } => check(config.as_deref(), jwt_secret),
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) -> CliResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| {
            CliError::config_error(format!("Invalid log_level '{}': {}", level, e))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| CliError::boot_failed(format!("Failed to install logger: {}", e)))
}

/// Start the HTTP server
///
/// 1. Load configuration and apply overrides
/// 2. Load the catalog and signing secret
/// 3. Serve until the process is stopped
pub fn serve(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    jwt_secret: Option<String>,
) -> CliResult<()> {
    let mut config = Config::resolve(config_path)?.with_secret_override(jwt_secret);
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    init_logging(&config.log_level)?;

    let jwt_config = config.jwt_config()?;
    let catalog = config.catalog()?;
    tracing::info!(
        books = catalog.len(),
        token_ttl_secs = config.token_ttl_secs,
        "configuration loaded"
    );

    let server = HttpServer::new(config.server.clone(), catalog, jwt_config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate configuration and catalog without serving
pub fn check(config_path: Option<&Path>, jwt_secret: Option<String>) -> CliResult<()> {
    let summary = check_config(config_path, jwt_secret)?;
    write_response(summary)
}

fn check_config(
    config_path: Option<&Path>,
    jwt_secret: Option<String>,
) -> CliResult<serde_json::Value> {
    let config = Config::resolve(config_path)?.with_secret_override(jwt_secret);
    config.jwt_config()?;
    let catalog = config.catalog()?;

    Ok(json!({
        "address": config.server.socket_addr(),
        "books": catalog.len(),
        "token_ttl_secs": config.token_ttl_secs,
        "lookup_delay_ms": config.server.lookup_delay_ms,
    }))
}
