//! Inventory error types.

use thiserror::Error;

/// Errors that abort an inventory build.
///
/// Malformed individual records are not errors; the parser skips them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Truncated or corrupt zlib payload
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Header does not describe a zlib-compressed v2 inventory
    #[error("Invalid inventory format: {0}")]
    InvalidFormat(String),
}
