//! Hookline - webhook trigger provider host
//!
//! Main entry point for the Hookline CLI and server.

mod cli;
mod server;

use clap::Parser;

use hookline_config::ConfigLoader;

use crate::cli::{Cli, Commands};
use crate::server::{init_tracing, run_server, validate_config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ConfigLoader::load_or_default(&cli.config)?;

    init_tracing(&config.logging)?;

    match cli.command {
        None => run_server(config, None, None).await,
        Some(Commands::Run { host, port }) => run_server(config, host, port).await,
        Some(Commands::Validate) => validate_config(&config).await,
    }
}
