//! # rtfm-lookup
//!
//! Lazy per-source inventory cache and lookup orchestration.
//!
//! On the first query for a source its `objects.inv` is fetched,
//! decompressed and parsed once; later queries reuse the cached index.
//! Concurrent first queries share a single build.
//!
//! ## Example
//!
//! ```no_run
//! use rtfm_lookup::{DocsLookup, LookupOutcome};
//! use rtfm_types::Settings;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let lookup = DocsLookup::from_settings(&Settings::default())?;
//! if let LookupOutcome::Matches(entries) = lookup.query("python", Some("asyncio.run")).await? {
//!     for entry in entries {
//!         println!("{} -> {}", entry.key, entry.url);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod lookup;
pub mod query;

pub use cache::{CacheStatus, IndexCache};
pub use error::LookupError;
pub use fetcher::{inventory_url, HttpFetcher, InventoryFetcher, StaticFetcher};
pub use lookup::{DocsLookup, LookupOutcome, DEFAULT_RESULT_LIMIT};
pub use query::{normalize_term, redirect_inherited, MESSAGEABLE_MEMBERS};
