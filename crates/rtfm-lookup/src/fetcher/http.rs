//! HTTP inventory fetcher.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use rtfm_types::{HttpSettings, SourceConfig};

use super::{inventory_url, InventoryFetcher};
use crate::error::LookupError;

/// Downloads inventories with a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the configured timeout and User-Agent.
    pub fn new(settings: &HttpSettings) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| LookupError::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Use an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InventoryFetcher for HttpFetcher {
    async fn fetch(&self, source: &SourceConfig) -> Result<Vec<u8>, LookupError> {
        let url = inventory_url(&source.base_url);
        debug!(source = %source.id, url = %url, "Fetching inventory");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LookupError::Fetch(format!("{url} returned {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Fetch(format!("{url}: {e}")))?;

        debug!(source = %source.id, bytes = body.len(), "Fetched inventory");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_from_default_settings() {
        assert!(HttpFetcher::new(&HttpSettings::default()).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let fetcher = HttpFetcher::new(&HttpSettings::default()).unwrap();
        // Port 9 (discard) on localhost refuses connections.
        let source = SourceConfig::new("local", "http://127.0.0.1:9/docs");
        let result = fetcher.fetch(&source).await;
        assert!(matches!(result, Err(LookupError::Fetch(_))));
    }
}
