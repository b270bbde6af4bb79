//! End-to-end test infrastructure for rtfm.
//!
//! Provides a shared TestHarness that serves inventories from a local mock
//! HTTP server, so tests cover the full fetch-to-ranked-results pipeline.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

use rtfm_inventory::{encode_inventory, InventoryHeader};
use rtfm_lookup::{DocsLookup, HttpFetcher, LookupOutcome};
use rtfm_types::{HttpSettings, SourceConfig, SourceRegistry};

/// Records resembling a discord.py inventory.
pub const DISCORD_RECORDS: &[&str] = &[
    "discord py:module 0 index.html#module-$ -",
    "discord.Client py:class 1 api.html#$ -",
    "discord.Client.fetch_user py:method 1 api.html#$ -",
    "discord.Client.fetch_guild py:method 1 api.html#$ -",
    "discord.TextChannel py:class 1 api.html#$ -",
    "discord.TextChannel.send py:method 1 api.html#$ -",
    "discord.abc.Messageable py:class 1 api.html#$ -",
    "discord.abc.Messageable.send py:method 1 api.html#$ -",
    "discord.abc.Messageable.history py:method 1 api.html#$ -",
    "discord.ext.commands.Bot py:class 1 ext/commands/api.html#$ -",
    "discord.ext.commands.AutoShardedBot py:class 1 ext/commands/api.html#$ -",
    "discord.ext.commands.Context py:class 1 ext/commands/api.html#$ -",
    "intents std:label -1 intents.html#intents-primer Gateway Intents",
    "faq std:doc -1 faq.html Frequently Asked Questions",
];

/// Records resembling the Python standard library inventory.
pub const PYTHON_RECORDS: &[&str] = &[
    "asyncio py:module 0 library/asyncio.html#module-$ -",
    "asyncio.run py:function 1 library/asyncio-task.html#$ -",
    "asyncio.gather py:function 1 library/asyncio-task.html#$ -",
    "str.format py:method 1 library/stdtypes.html#$ -",
    "string py:module 0 library/string.html#module-$ -",
];

/// Byte offset where the compressed body of an inventory starts.
pub fn body_offset(payload: &[u8]) -> usize {
    payload
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .nth(3)
        .map(|(idx, _)| idx + 1)
        .expect("inventory has a four-line header")
}

/// Encode an inventory payload for `records`.
pub fn inventory(project: &str, records: &[&str]) -> Vec<u8> {
    let header = InventoryHeader {
        project: project.to_string(),
        version: "1.0".to_string(),
    };
    encode_inventory(&header, records).expect("Failed to encode inventory")
}

/// Shared test harness for E2E tests.
///
/// Each harness owns its own mock server; sources are mounted under
/// distinct path prefixes.
pub struct TestHarness {
    pub server: MockServer,
}

impl TestHarness {
    /// Start a harness with an empty mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL for a source mounted at `prefix`.
    pub fn base_url(&self, prefix: &str) -> String {
        format!("{}/{}", self.server.uri(), prefix)
    }

    /// Source config pointing at `prefix` on the mock server.
    pub fn source(&self, id: &str, prefix: &str) -> SourceConfig {
        SourceConfig::new(id, self.base_url(prefix))
    }

    /// Serve `body` as `/{prefix}/objects.inv`, expecting exactly `hits` requests.
    pub async fn mount_inventory(&self, prefix: &str, body: Vec<u8>, hits: impl Into<Times>) {
        self.mount(prefix, ResponseTemplate::new(200).set_body_bytes(body), hits)
            .await;
    }

    /// Same as [`TestHarness::mount_inventory`] but the response is delayed.
    pub async fn mount_slow_inventory(
        &self,
        prefix: &str,
        body: Vec<u8>,
        delay: Duration,
        hits: impl Into<Times>,
    ) {
        self.mount(
            prefix,
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .set_delay(delay),
            hits,
        )
        .await;
    }

    /// Respond to `/{prefix}/objects.inv` with a bare status code.
    pub async fn mount_status(&self, prefix: &str, status: u16, hits: impl Into<Times>) {
        self.mount(prefix, ResponseTemplate::new(status), hits).await;
    }

    async fn mount(&self, prefix: &str, response: ResponseTemplate, hits: impl Into<Times>) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/objects.inv", prefix)))
            .respond_with(response)
            .expect(hits)
            .mount(&self.server)
            .await;
    }

    /// Build a lookup over `sources` that fetches through real HTTP.
    pub fn lookup(&self, sources: Vec<SourceConfig>) -> DocsLookup {
        let settings = HttpSettings {
            timeout_secs: 5,
            ..HttpSettings::default()
        };
        let fetcher = HttpFetcher::new(&settings).expect("Failed to build HTTP fetcher");
        DocsLookup::new(SourceRegistry::new(sources), Arc::new(fetcher))
    }
}

/// Labels of a matches outcome, best first.
pub fn labels(outcome: &LookupOutcome) -> Vec<String> {
    outcome
        .items()
        .into_iter()
        .map(|(label, _)| label.to_string())
        .collect()
}
