//! CLI module for Bookshelf
//!
//! Provides command-line interface for:
//! - serve: Load configuration and run the HTTP server
//! - check: Validate configuration and catalog, print a summary

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, init_logging, run, run_command, serve};
pub use config::{Config, DEFAULT_CONFIG_PATH};
pub use errors::{CliError, CliErrorCode, CliResult};
