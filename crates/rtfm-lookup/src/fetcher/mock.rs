//! In-memory fetcher for tests and offline use.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use rtfm_types::SourceConfig;

use super::InventoryFetcher;
use crate::error::LookupError;

/// Serves fixed payloads keyed by source id and counts every fetch.
///
/// Sources without a payload fail with `LookupError::Fetch`, like a 404.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    payloads: HashMap<String, Vec<u8>>,
    delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` for `source_id`.
    pub fn with_payload(mut self, source_id: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.payloads.insert(source_id.into(), bytes);
        self
    }

    /// Sleep before answering, to keep builds in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches started so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventoryFetcher for StaticFetcher {
    async fn fetch(&self, source: &SourceConfig) -> Result<Vec<u8>, LookupError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.payloads
            .get(&source.id)
            .cloned()
            .ok_or_else(|| LookupError::Fetch(format!("no inventory for {}", source.id)))
    }
}
