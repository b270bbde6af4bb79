//! Sphinx inventory (v2) parsing.
//!
//! Header layout:
//!
//! ```text
//! # Sphinx inventory version 2
//! # Project: discord.py
//! # Version: 2.4
//! # The remainder of this file is compressed using zlib.
//! ```
//!
//! Every decompressed record has the shape
//! `NAME DOMAIN:ROLE PRIORITY LOCATION DISPNAME`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use rtfm_types::{InventoryEntry, SourceIndex};

use crate::error::InventoryError;
use crate::reader::InventoryReader;

/// Required first header line.
pub const INVENTORY_MARKER: &str = "# Sphinx inventory version 2";

/// Record kind that is only indexed once per name.
pub const DEFAULT_MODULE_KIND: &str = "py:module";

/// Namespace qualifiers removed from keys, applied in order.
pub const DEFAULT_STRIPPED_PREFIXES: &[&str] = &[
    "discord.ext.commands.",
    "discord.ext.menus.",
    "discord.ext.ipc.",
    "discord.",
];

const PROJECT_PREFIX: &str = "# Project: ";
const VERSION_PREFIX: &str = "# Version: ";

static RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+(\S*:\S*)\s+(-?\d+)\s+(\S+)\s+(.*)")
        .expect("record pattern is valid")
});

/// Project metadata from the header lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryHeader {
    pub project: String,
    pub version: String,
}

/// Read and validate the four header lines.
pub fn read_header(reader: &mut InventoryReader<'_>) -> Result<InventoryHeader, InventoryError> {
    let marker = reader.read_line().unwrap_or_default();
    if marker.trim_end() != INVENTORY_MARKER {
        return Err(InventoryError::InvalidFormat(format!(
            "unsupported inventory version line: {:?}",
            marker.trim_end()
        )));
    }

    let project = header_value(reader.read_line(), PROJECT_PREFIX, "project")?;
    let version = header_value(reader.read_line(), VERSION_PREFIX, "version")?;

    let compression = reader.read_line().ok_or_else(|| {
        InventoryError::InvalidFormat("missing compression header line".to_string())
    })?;
    if !compression.contains("zlib") {
        return Err(InventoryError::InvalidFormat(
            "inventory body is not zlib compressed".to_string(),
        ));
    }

    Ok(InventoryHeader { project, version })
}

fn header_value(
    line: Option<String>,
    prefix: &str,
    what: &str,
) -> Result<String, InventoryError> {
    let line =
        line.ok_or_else(|| InventoryError::InvalidFormat(format!("missing {what} header line")))?;
    let line = line.trim_end();
    Ok(line.strip_prefix(prefix).unwrap_or(line).to_string())
}

/// One raw record, borrowed from its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord<'a> {
    pub name: &'a str,
    /// Full `domain:role` token
    pub directive: &'a str,
    pub domain: &'a str,
    pub role: &'a str,
    pub priority: i64,
    pub location: &'a str,
    pub display_name: &'a str,
}

/// Match a decompressed line against the record grammar.
///
/// Returns `None` for anything that does not fit; such lines are skipped.
pub fn parse_record(line: &str) -> Option<InventoryRecord<'_>> {
    let caps = RECORD_RE.captures(line.trim_end())?;

    let name = caps.get(1)?.as_str();
    let directive = caps.get(2)?.as_str();
    let priority = caps.get(3)?.as_str().parse().ok()?;
    let location = caps.get(4)?.as_str();
    let display_name = caps.get(5)?.as_str();

    let (domain, role) = directive.split_once(':').unwrap_or((directive, ""));

    Some(InventoryRecord {
        name,
        directive,
        domain,
        role,
        priority,
        location,
        display_name,
    })
}

/// Join a relative location onto a base URL with a single `/`.
pub fn join_url(base_url: &str, location: &str) -> String {
    if location.is_empty() {
        return base_url.to_string();
    }
    match (base_url.ends_with('/'), location.starts_with('/')) {
        (true, true) => format!("{}{}", base_url, &location[1..]),
        (false, false) => format!("{base_url}/{location}"),
        _ => format!("{base_url}{location}"),
    }
}

/// Turns inventory bytes into a [`SourceIndex`].
#[derive(Debug, Clone)]
pub struct InventoryParser {
    module_kind: String,
    stripped_prefixes: Vec<String>,
}

impl Default for InventoryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryParser {
    /// Parser with the default module kind and qualifier list.
    pub fn new() -> Self {
        Self {
            module_kind: DEFAULT_MODULE_KIND.to_string(),
            stripped_prefixes: DEFAULT_STRIPPED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Use a different `domain:role` as the first-wins record kind.
    pub fn with_module_kind(mut self, kind: impl Into<String>) -> Self {
        self.module_kind = kind.into();
        self
    }

    /// Replace the list of qualifiers stripped from keys.
    pub fn with_stripped_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stripped_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a complete `objects.inv` buffer.
    pub fn parse(
        &self,
        source_id: &str,
        base_url: &str,
        buffer: &[u8],
    ) -> Result<SourceIndex, InventoryError> {
        let mut reader = InventoryReader::new(buffer);
        let header = read_header(&mut reader)?;
        self.parse_lines(source_id, base_url, header, reader.compressed_lines())
    }

    /// Build an index from already-decompressed lines.
    pub fn parse_lines<I>(
        &self,
        source_id: &str,
        base_url: &str,
        header: InventoryHeader,
        lines: I,
    ) -> Result<SourceIndex, InventoryError>
    where
        I: IntoIterator<Item = Result<String, InventoryError>>,
    {
        let mut index = SourceIndex::new(source_id, base_url);
        index.project = header.project;
        index.version = header.version;

        let mut keys: HashSet<String> = HashSet::new();
        let mut skipped = 0usize;

        for line in lines {
            let line = line?;
            let Some(record) = parse_record(&line) else {
                skipped += 1;
                continue;
            };

            if record.directive == self.module_kind && keys.contains(record.name) {
                skipped += 1;
                continue;
            }

            let entry = self.entry_for(base_url, &record);
            keys.insert(entry.key.clone());
            index.entries.push(entry);
        }

        debug!(
            source = source_id,
            entries = index.entries.len(),
            skipped,
            "Parsed inventory"
        );

        Ok(index)
    }

    fn entry_for(&self, base_url: &str, record: &InventoryRecord<'_>) -> InventoryEntry {
        let role = if record.directive == "std:doc" {
            "label"
        } else {
            record.role
        };

        let location = match record.location.strip_suffix('$') {
            Some(anchor) => format!("{anchor}{}", record.name),
            None => record.location.to_string(),
        };

        let label = if record.display_name == "-" {
            record.name
        } else {
            record.display_name
        };
        let label = self
            .stripped_prefixes
            .iter()
            .fold(label.to_string(), |acc, prefix| acc.replace(prefix.as_str(), ""));

        let key = if record.domain == "std" {
            format!("{role}:{label}")
        } else {
            label
        };

        InventoryEntry::new(key, join_url(base_url, &location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const BASE: &str = "https://docs.example/v1";

    fn inventory(records: &str) -> Vec<u8> {
        let mut buffer = format!(
            "{INVENTORY_MARKER}\n# Project: demo\n# Version: 1.2\n\
             # The remainder of this file is compressed using zlib.\n"
        )
        .into_bytes();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(records.as_bytes()).unwrap();
        buffer.extend(encoder.finish().unwrap());
        buffer
    }

    fn keys(index: &SourceIndex) -> Vec<&str> {
        index.keys().collect()
    }

    #[test]
    fn test_parse_record_fields() {
        let record = parse_record("Client.fetch_user py:method 1 api.html#$ -").unwrap();
        assert_eq!(record.name, "Client.fetch_user");
        assert_eq!(record.directive, "py:method");
        assert_eq!(record.domain, "py");
        assert_eq!(record.role, "method");
        assert_eq!(record.priority, 1);
        assert_eq!(record.location, "api.html#$");
        assert_eq!(record.display_name, "-");
    }

    #[test]
    fn test_parse_record_name_with_spaces() {
        let record =
            parse_record("intents primer std:label -1 intents.html#intents-primer A Primer to Gateway Intents")
                .unwrap();
        assert_eq!(record.name, "intents primer");
        assert_eq!(record.priority, -1);
        assert_eq!(record.display_name, "A Primer to Gateway Intents");
    }

    #[test]
    fn test_parse_record_rejects_garbage() {
        assert!(parse_record("").is_none());
        assert!(parse_record("just some words").is_none());
        assert!(parse_record("name py:class notanumber loc -").is_none());
    }

    #[test]
    fn test_header_metadata() {
        let index = InventoryParser::new()
            .parse("demo", BASE, &inventory("Widget py:class 1 api.html#$ -\n"))
            .unwrap();
        assert_eq!(index.project, "demo");
        assert_eq!(index.version, "1.2");
        assert_eq!(index.source_id, "demo");
    }

    #[test]
    fn test_wrong_marker_is_invalid_format() {
        let mut buffer = inventory("Widget py:class 1 api.html#$ -\n");
        buffer[27] = b'1'; // "version 2" -> "version 1"
        let result = InventoryParser::new().parse("demo", BASE, &buffer);
        assert!(matches!(result, Err(InventoryError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_zlib_marker_is_invalid_format() {
        let buffer = format!("{INVENTORY_MARKER}\n# Project: x\n# Version: 1\n# plain text\n");
        let result = InventoryParser::new().parse("demo", BASE, buffer.as_bytes());
        assert!(matches!(result, Err(InventoryError::InvalidFormat(_))));
    }

    #[test]
    fn test_short_header_is_invalid_format() {
        let buffer = format!("{INVENTORY_MARKER}\n# Project: x\n");
        let result = InventoryParser::new().parse("demo", BASE, buffer.as_bytes());
        assert!(matches!(result, Err(InventoryError::InvalidFormat(_))));

        let result = InventoryParser::new().parse("demo", BASE, b"");
        assert!(matches!(result, Err(InventoryError::InvalidFormat(_))));
    }

    #[test]
    fn test_anchor_expansion() {
        let index = InventoryParser::new()
            .parse("demo", BASE, &inventory("Widget py:class 1 api.html#$ -\n"))
            .unwrap();
        assert_eq!(index.entries[0].url, "https://docs.example/v1/api.html#Widget");
    }

    #[test]
    fn test_module_records_first_wins() {
        let records = "\
asyncio py:module 0 library/asyncio.html#module-$ -
asyncio py:module 0 library/other.html#module-$ -
asyncio.run py:function 1 library/asyncio-runner.html#$ -
";
        let index = InventoryParser::new()
            .parse("python", BASE, &inventory(records))
            .unwrap();
        assert_eq!(keys(&index), vec!["asyncio", "asyncio.run"]);
        assert_eq!(
            index.entries[0].url,
            "https://docs.example/v1/library/asyncio.html#module-asyncio"
        );
    }

    #[test]
    fn test_non_module_duplicates_are_kept() {
        let records = "\
send py:method 1 a.html#$ -
send py:method 1 b.html#$ -
";
        let index = InventoryParser::new()
            .parse("demo", BASE, &inventory(records))
            .unwrap();
        assert_eq!(keys(&index), vec!["send", "send"]);
    }

    #[test]
    fn test_std_domain_prefix_and_doc_label() {
        let records = "\
intents std:label -1 intents.html#intents Gateway Intents
intents std:doc -1 intents.html -
";
        let index = InventoryParser::new()
            .parse("demo", BASE, &inventory(records))
            .unwrap();
        assert_eq!(keys(&index), vec!["label:Gateway Intents", "label:intents"]);
        assert_eq!(index.entries[1].url, "https://docs.example/v1/intents.html");
    }

    #[test]
    fn test_redundant_qualifiers_are_stripped() {
        let records = "\
discord.ext.commands.Bot py:class 1 ext/commands/api.html#$ -
discord.Client py:class 1 api.html#$ -
discord.ext.menus.Menu py:class 1 menus.html#$ -
";
        let index = InventoryParser::new()
            .parse("discord.py", BASE, &inventory(records))
            .unwrap();
        assert_eq!(keys(&index), vec!["Bot", "Client", "Menu"]);
        assert_eq!(
            index.entries[0].url,
            "https://docs.example/v1/ext/commands/api.html#discord.ext.commands.Bot"
        );
    }

    #[test]
    fn test_custom_parser_options() {
        let records = "\
mylib.core py:module 0 core.html -
mylib.core py:module 0 core2.html -
mylib.Thing py:class 1 core.html#$ -
";
        let index = InventoryParser::new()
            .with_module_kind("py:class")
            .with_stripped_prefixes(["mylib."])
            .parse("mylib", BASE, &inventory(records))
            .unwrap();
        assert_eq!(keys(&index), vec!["core", "core", "Thing"]);
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let records = "\
not a record
Widget py:class 1 api.html#$ -

Gadget py:class oops api.html#$ -
";
        let index = InventoryParser::new()
            .parse("demo", BASE, &inventory(records))
            .unwrap();
        assert_eq!(keys(&index), vec!["Widget"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let buffer = inventory(
            "b py:function 1 b.html#$ -\na py:function 1 a.html#$ -\nc std:doc -1 c.html -\n",
        );
        let parser = InventoryParser::new();
        let first = parser.parse("demo", BASE, &buffer).unwrap();
        let second = parser.parse("demo", BASE, &buffer).unwrap();
        assert_eq!(first, second);
        assert_eq!(keys(&first), vec!["b", "a", "label:c"]);
    }

    #[test]
    fn test_corrupt_body_aborts_parse() {
        let mut buffer = inventory("Widget py:class 1 api.html#$ -\n");
        let len = buffer.len();
        buffer.truncate(len - 6);
        let result = InventoryParser::new().parse("demo", BASE, &buffer);
        assert!(matches!(result, Err(InventoryError::Decompression(_))));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a.b/v1", "x.html"), "https://a.b/v1/x.html");
        assert_eq!(join_url("https://a.b/v1/", "x.html"), "https://a.b/v1/x.html");
        assert_eq!(join_url("https://a.b/v1/", "/x.html"), "https://a.b/v1/x.html");
        assert_eq!(join_url("https://a.b/v1", ""), "https://a.b/v1");
    }
}
