//! CLI definitions for Hookline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hookline CLI.
#[derive(Parser)]
#[command(name = "hookline")]
#[command(about = "Webhook trigger provider host")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the server in foreground (default)
    Run {
        /// Server host, overrides `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate the configuration and check provider credentials
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::try_parse_from(["hookline"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_run_overrides() {
        let cli =
            Cli::try_parse_from(["hookline", "run", "--host", "0.0.0.0", "--port", "9090"]).unwrap();
        match cli.command {
            Some(Commands::Run { host, port }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9090));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["hookline", "validate", "--config", "/etc/hookline.toml"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/hookline.toml"));
        assert!(matches!(cli.command, Some(Commands::Validate)));
    }
}
