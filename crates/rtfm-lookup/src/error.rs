//! Lookup error types.

use rtfm_inventory::InventoryError;
use thiserror::Error;

/// Errors returned by index builds and lookups.
///
/// Cloneable so a single shared build can report the same failure to every
/// caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Transport failure or non-200 response while fetching the inventory
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Truncated or corrupt compressed payload
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Inventory header is not a zlib-compressed v2 inventory
    #[error("Invalid inventory format: {0}")]
    InvalidFormat(String),

    /// No configured source has this id or alias
    #[error("Unknown documentation source: {0}")]
    UnknownSource(String),

    /// The build task panicked or was cancelled at shutdown
    #[error("Index build did not complete: {0}")]
    Build(String),
}

impl LookupError {
    /// True for failures a later query may succeed after.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LookupError::UnknownSource(_))
    }
}

impl From<InventoryError> for LookupError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Decompression(msg) => LookupError::Decompression(msg),
            InventoryError::InvalidFormat(msg) => LookupError::InvalidFormat(msg),
        }
    }
}
