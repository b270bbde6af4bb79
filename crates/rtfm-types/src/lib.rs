//! # rtfm-types
//!
//! Shared domain types for the rtfm documentation lookup system.
//!
//! This crate defines the data structures used throughout the workspace:
//! - Entries: `(key, url)` pairs parsed from a Sphinx inventory
//! - Source indexes: the parsed inventory of one documentation source
//! - Sources: the static `{ id -> base URL }` table and alias resolution
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use rtfm_types::InventoryEntry;
//!
//! let entry = InventoryEntry::new("Widget", "https://docs.example/v1/api.html#Widget");
//! assert_eq!(entry.key, "Widget");
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod source;

pub use config::{HttpSettings, Settings};
pub use entry::{InventoryEntry, SourceIndex};
pub use error::ConfigError;
pub use source::{SourceConfig, SourceRegistry};
