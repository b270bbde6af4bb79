//! rtfm
//!
//! Look up Python and Discord library documentation from the command line.
//!
//! # Usage
//!
//! ```bash
//! rtfm lookup [--source SOURCE] [--limit N] [TERM...]
//! rtfm sources
//! rtfm warm [SOURCE...]
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/rtfm/config.toml)
//! 3. Environment variables (RTFM_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use rtfm_cli::{handle_lookup, list_sources, warm_sources, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup {
            source,
            limit,
            term,
        } => {
            handle_lookup(
                cli.config.as_deref(),
                cli.log_level.as_deref(),
                source,
                limit,
                term,
            )
            .await?;
        }
        Commands::Sources => {
            list_sources(cli.config.as_deref(), cli.log_level.as_deref())?;
        }
        Commands::Warm { sources } => {
            warm_sources(cli.config.as_deref(), cli.log_level.as_deref(), sources).await?;
        }
    }

    Ok(())
}
