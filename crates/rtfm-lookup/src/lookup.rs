//! Lookup orchestration.
//!
//! Resolves the source, makes sure its index is built, normalizes the
//! query and ranks the entries.

use std::sync::Arc;

use tracing::{debug, info};

use rtfm_inventory::InventoryParser;
use rtfm_matcher::rank;
use rtfm_types::{InventoryEntry, Settings, SourceConfig, SourceIndex, SourceRegistry};

use crate::cache::IndexCache;
use crate::error::LookupError;
use crate::fetcher::{HttpFetcher, InventoryFetcher};
use crate::query::{normalize_term, redirect_inherited};

/// Default number of ranked matches per query.
pub const DEFAULT_RESULT_LIMIT: usize = 8;

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// No term was given; the documentation root.
    Root { url: String },
    /// Ranked matches, best first.
    Matches(Vec<InventoryEntry>),
    /// The term matched nothing.
    Empty,
}

impl LookupOutcome {
    /// Display-ready lines: the root URL, or one markdown link per match.
    pub fn render_lines(&self) -> Vec<String> {
        match self {
            LookupOutcome::Root { url } => vec![url.clone()],
            LookupOutcome::Matches(entries) => entries
                .iter()
                .map(|entry| format!("[`{}`]({})", entry.key, entry.url))
                .collect(),
            LookupOutcome::Empty => Vec::new(),
        }
    }

    /// Matched `(label, url)` pairs; empty for the other outcomes.
    pub fn items(&self) -> Vec<(&str, &str)> {
        match self {
            LookupOutcome::Matches(entries) => entries
                .iter()
                .map(|entry| (entry.key.as_str(), entry.url.as_str()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Answers `(source, term)` queries against lazily built indexes.
///
/// Create one at startup and share it (e.g. behind an `Arc`) with whatever
/// issues queries; call [`DocsLookup::shutdown`] when tearing down.
pub struct DocsLookup {
    registry: SourceRegistry,
    cache: IndexCache,
    limit: usize,
}

impl DocsLookup {
    /// Create a lookup over `registry` fetching through `fetcher`.
    pub fn new(registry: SourceRegistry, fetcher: Arc<dyn InventoryFetcher>) -> Self {
        Self {
            registry,
            cache: IndexCache::new(fetcher),
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    /// Create a lookup from loaded settings, fetching over HTTP.
    pub fn from_settings(settings: &Settings) -> Result<Self, LookupError> {
        let fetcher = HttpFetcher::new(&settings.http)?;
        Ok(Self::new(settings.registry(), Arc::new(fetcher)).with_limit(settings.result_limit))
    }

    /// Override the number of matches returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Parse inventories with a custom parser.
    pub fn with_parser(mut self, parser: InventoryParser) -> Self {
        self.cache = self.cache.with_parser(parser);
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Resolve a source id or alias.
    pub fn source(&self, name: &str) -> Result<&SourceConfig, LookupError> {
        self.registry
            .resolve(name)
            .ok_or_else(|| LookupError::UnknownSource(name.to_string()))
    }

    /// Look up `term` in the documentation of `source`.
    ///
    /// A missing or blank term returns the source's root URL without
    /// building anything.
    pub async fn query(
        &self,
        source: &str,
        term: Option<&str>,
    ) -> Result<LookupOutcome, LookupError> {
        let source = self.source(source)?;

        let term = match term.map(str::trim) {
            Some(term) if !term.is_empty() => term,
            _ => {
                return Ok(LookupOutcome::Root {
                    url: source.base_url.clone(),
                })
            }
        };

        let index = self.cache.ensure(source).await?;

        let mut needle = normalize_term(term).to_string();
        if source.unstable {
            if let Some(redirected) = redirect_inherited(&needle) {
                debug!(from = %needle, to = %redirected, "Redirecting inherited member");
                needle = redirected;
            }
        }

        let matches: Vec<InventoryEntry> = rank(&needle, &index.entries, self.limit)
            .into_iter()
            .cloned()
            .collect();

        info!(
            source = %source.id,
            query = %needle,
            results = matches.len(),
            "Lookup complete"
        );

        if matches.is_empty() {
            Ok(LookupOutcome::Empty)
        } else {
            Ok(LookupOutcome::Matches(matches))
        }
    }

    /// Build (or reuse) the index for `source` without querying it.
    pub async fn warm(&self, source: &str) -> Result<Arc<SourceIndex>, LookupError> {
        let source = self.source(source)?;
        self.cache.ensure(source).await
    }

    /// Abort in-flight builds and release cached indexes.
    pub fn shutdown(&self) {
        self.cache.shutdown();
    }
}
