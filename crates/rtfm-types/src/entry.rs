//! Inventory entries and per-source indexes.

use serde::{Deserialize, Serialize};

/// A single searchable documentation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Normalized display label, e.g. `Client.fetch_user` or `label:intents`
    pub key: String,
    /// Absolute link to the documented object
    pub url: String,
}

impl InventoryEntry {
    /// Create a new entry.
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
        }
    }
}

/// The parsed inventory of one documentation source.
///
/// Entries keep file order. Once cached, an index is shared behind an `Arc`
/// and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIndex {
    /// Source identifier (e.g. "python")
    pub source_id: String,
    /// Base URL the entry locations were joined onto
    pub base_url: String,
    /// Project name from the inventory header
    pub project: String,
    /// Project version from the inventory header
    pub version: String,
    /// Entries in file order
    pub entries: Vec<InventoryEntry>,
}

impl SourceIndex {
    /// Create an empty index for a source.
    pub fn new(source_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            base_url: base_url.into(),
            project: String::new(),
            version: String::new(),
            entries: Vec::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the inventory held no usable records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entry keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_index_is_empty() {
        let index = SourceIndex::new("python", "https://docs.python.org/3");
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.base_url, "https://docs.python.org/3");
    }

    #[test]
    fn test_keys_follow_file_order() {
        let mut index = SourceIndex::new("demo", "https://docs.example");
        index.entries.push(InventoryEntry::new("b", "https://docs.example/b"));
        index.entries.push(InventoryEntry::new("a", "https://docs.example/a"));

        let keys: Vec<&str> = index.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_entry_serialization() {
        let entry = InventoryEntry::new("Widget", "https://docs.example/api.html#Widget");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"key":"Widget","url":"https://docs.example/api.html#Widget"}"#
        );
    }
}
