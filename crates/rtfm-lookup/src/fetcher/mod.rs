//! Inventory fetching.
//!
//! The network is an external collaborator: the cache only sees the
//! [`InventoryFetcher`] trait. [`HttpFetcher`] is the production
//! implementation, [`StaticFetcher`] serves in-memory payloads.

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::StaticFetcher;

use async_trait::async_trait;

use rtfm_inventory::join_url;
use rtfm_types::SourceConfig;

use crate::error::LookupError;

/// File name of the inventory below a documentation root.
pub const INVENTORY_FILE: &str = "objects.inv";

/// Location of a source's inventory.
pub fn inventory_url(base_url: &str) -> String {
    join_url(base_url, INVENTORY_FILE)
}

/// Retrieves the raw compressed inventory for a source.
///
/// Implementations must be thread-safe; one fetcher is shared by every
/// build.
#[async_trait]
pub trait InventoryFetcher: Send + Sync {
    /// Fetch `objects.inv` for `source`.
    ///
    /// Anything but a complete successful download is `LookupError::Fetch`.
    async fn fetch(&self, source: &SourceConfig) -> Result<Vec<u8>, LookupError>;
}
