//! rtfm command-line library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (lookup, sources, warm)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{
    format_outcome, format_sources, handle_lookup, init_logging, list_sources, load_settings,
    warm_all, warm_sources,
};
