//! # rtfm-inventory
//!
//! Reads Sphinx `objects.inv` files into searchable [`SourceIndex`] values.
//!
//! ## Features
//! - Header validation for version 2 inventories
//! - Chunked zlib decompression yielding lines lazily
//! - Record parsing with anchor expansion, `std` label prefixes and
//!   namespace qualifier stripping
//! - Encoding of v2 payloads for fixtures
//!
//! [`SourceIndex`]: rtfm_types::SourceIndex

pub mod error;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::InventoryError;
pub use parser::{
    join_url, parse_record, read_header, InventoryHeader, InventoryParser, InventoryRecord,
    DEFAULT_MODULE_KIND, DEFAULT_STRIPPED_PREFIXES, INVENTORY_MARKER,
};
pub use reader::{CompressedLines, InventoryReader, CHUNK_SIZE};
pub use writer::encode_inventory;
