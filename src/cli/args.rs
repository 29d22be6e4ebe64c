//! CLI argument definitions using clap
//!
//! Commands:
//! - bookshelf serve [--config <path>] [--host <h>] [--port <p>]
//! - bookshelf check [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bookshelf - a small online bookstore API
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file (default: ./bookshelf.json if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port
        #[arg(long)]
        port: Option<u16>,

        /// Credential signing secret
        #[arg(long, env = "BOOKSHELF_JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,
    },

    /// Validate configuration and catalog, then exit
    Check {
        /// Path to configuration file (default: ./bookshelf.json if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Credential signing secret
        #[arg(long, env = "BOOKSHELF_JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "bookshelf",
            "serve",
            "--port",
            "8080",
            "--jwt-secret",
            "s3cret",
        ])
        .unwrap();

        match cli.command {
            Command::Serve {
                port, jwt_secret, config, ..
            } => {
                assert_eq!(port, Some(8080));
                assert_eq!(jwt_secret.as_deref(), Some("s3cret"));
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_with_config() {
        let cli =
            Cli::try_parse_from(["bookshelf", "check", "--config", "shop.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Check { config: Some(ref p), .. } if p == &PathBuf::from("shop.json")
        ));
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["bookshelf", "explode"]).is_err());
    }
}
