//! CLI argument parsing.
//!
//! CLI flags override every other config source.

use clap::{Parser, Subcommand};

/// Documentation lookup over Sphinx inventories
#[derive(Parser, Debug)]
#[command(name = "rtfm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/rtfm/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up a term in a documentation source
    Lookup {
        /// Source id or alias (default from config)
        #[arg(short, long)]
        source: Option<String>,

        /// Maximum number of matches
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Term to look up; omit to print the documentation root
        term: Vec<String>,
    },

    /// List configured documentation sources
    Sources,

    /// Build indexes ahead of time
    Warm {
        /// Sources to build (all when empty)
        sources: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_with_multi_word_term() {
        let cli = Cli::parse_from(["rtfm", "lookup", "-s", "py", "asyncio", "run"]);
        match cli.command {
            Commands::Lookup {
                source,
                limit,
                term,
            } => {
                assert_eq!(source.as_deref(), Some("py"));
                assert_eq!(limit, None);
                assert_eq!(term, vec!["asyncio", "run"]);
            }
            _ => panic!("Expected Lookup command"),
        }
    }

    #[test]
    fn test_lookup_without_term() {
        let cli = Cli::parse_from(["rtfm", "lookup"]);
        match cli.command {
            Commands::Lookup { source, term, .. } => {
                assert!(source.is_none());
                assert!(term.is_empty());
            }
            _ => panic!("Expected Lookup command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["rtfm", "sources", "--log-level", "debug", "-c", "x.toml"]);
        assert!(matches!(cli.command, Commands::Sources));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
    }

    #[test]
    fn test_warm_sources() {
        let cli = Cli::parse_from(["rtfm", "warm", "python", "nc"]);
        match cli.command {
            Commands::Warm { sources } => assert_eq!(sources, vec!["python", "nc"]),
            _ => panic!("Expected Warm command"),
        }
    }

    #[test]
    fn test_lookup_limit() {
        let cli = Cli::parse_from(["rtfm", "lookup", "-n", "3", "Bot"]);
        match cli.command {
            Commands::Lookup { limit, .. } => assert_eq!(limit, Some(3)),
            _ => panic!("Expected Lookup command"),
        }
    }
}
