//! Encoding of inventories in the v2 wire format.
//!
//! Used to serve fixtures and to round-trip parsed records.

use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::parser::{InventoryHeader, INVENTORY_MARKER};

const COMPRESSION_LINE: &str = "# The remainder of this file is compressed using zlib.";

/// Encode header metadata and record lines as an `objects.inv` payload.
pub fn encode_inventory<I, S>(header: &InventoryHeader, records: I) -> io::Result<Vec<u8>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut buffer = format!(
        "{INVENTORY_MARKER}\n# Project: {}\n# Version: {}\n{COMPRESSION_LINE}\n",
        header.project, header.version
    )
    .into_bytes();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    for record in records {
        encoder.write_all(record.as_ref().as_bytes())?;
        encoder.write_all(b"\n")?;
    }
    buffer.extend(encoder.finish()?);

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::InventoryParser;

    #[test]
    fn test_encoded_inventory_parses() {
        let header = InventoryHeader {
            project: "demo".to_string(),
            version: "0.1".to_string(),
        };
        let bytes = encode_inventory(
            &header,
            ["Widget py:class 1 api.html#$ -", "Gadget py:class 1 api.html#$ -"],
        )
        .unwrap();

        let index = InventoryParser::new()
            .parse("demo", "https://docs.example", &bytes)
            .unwrap();
        assert_eq!(index.project, "demo");
        assert_eq!(index.version, "0.1");
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["Widget", "Gadget"]);
    }

    #[test]
    fn test_empty_inventory() {
        let bytes = encode_inventory(&InventoryHeader::default(), Vec::<String>::new()).unwrap();
        let index = InventoryParser::new()
            .parse("demo", "https://docs.example", &bytes)
            .unwrap();
        assert!(index.is_empty());
    }
}
