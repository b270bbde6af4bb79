//! Documentation source table.
//!
//! The surrounding system supplies a static `{ id -> base URL }` table at
//! startup. Sources may also be reached through short aliases (`py`, `nc`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One documentation source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Canonical identifier (e.g. "python")
    pub id: String,

    /// Root of the published documentation; `objects.inv` lives below it
    pub base_url: String,

    /// Alternative names accepted on lookup
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Tracks an in-development branch of the docs.
    /// Queries for inherited `abc.Messageable` members are redirected.
    #[serde(default)]
    pub unstable: bool,
}

impl SourceConfig {
    /// Create a source with no aliases.
    pub fn new(id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_url: base_url.into(),
            aliases: Vec::new(),
            unstable: false,
        }
    }

    /// Add an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Mark the source as an unstable documentation channel.
    pub fn unstable(mut self) -> Self {
        self.unstable = true;
        self
    }
}

/// Built-in source table.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("python", "https://docs.python.org/3").with_alias("py"),
        SourceConfig::new("discord", "https://discord.readthedocs.io/en/latest"),
        SourceConfig::new("nextcord", "https://nextcord.readthedocs.io/en/latest")
            .with_alias("nc"),
        SourceConfig::new("discord.py", "https://discordpy.readthedocs.io/en/master").unstable(),
        SourceConfig::new("pycord", "https://docs.pycord.dev/en/master/").with_alias("pyc"),
    ]
}

/// Read-only lookup over the configured sources.
///
/// Ids and aliases resolve case-insensitively. When two sources claim the
/// same name the first one wins; `Settings::validate` rejects such tables.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<SourceConfig>,
    by_name: HashMap<String, usize>,
}

impl SourceRegistry {
    /// Build a registry from a source list.
    pub fn new(sources: Vec<SourceConfig>) -> Self {
        let mut by_name = HashMap::new();
        for (idx, source) in sources.iter().enumerate() {
            let names = std::iter::once(&source.id).chain(source.aliases.iter());
            for name in names {
                by_name.entry(name.to_lowercase()).or_insert(idx);
            }
        }
        Self { sources, by_name }
    }

    /// Resolve an id or alias.
    pub fn resolve(&self, name: &str) -> Option<&SourceConfig> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.sources[idx])
    }

    /// Iterate sources in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl From<Vec<SourceConfig>> for SourceRegistry {
    fn from(sources: Vec<SourceConfig>) -> Self {
        Self::new(sources)
    }
}
