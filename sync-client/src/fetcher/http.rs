//! HTTP page fetcher.
//!
//! Issues `GET <url>?order=<key>&cursor=<token>&limit=<n>` and decodes a
//! [`PageBody`]. The first page is requested with an empty `cursor`.

use async_trait::async_trait;
use pagesync_types::{Page, PageBody, PageRequest};
use std::time::Duration;

use super::{FetchError, PageFetcher};
use crate::config::ClientConfig;

/// Fetches pages from an HTTP endpoint with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpFetcher {
    /// Create a fetcher for `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Create a fetcher from the `[endpoint]` section of a config.
    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        Self::new(config.endpoint.url.clone(), config.timeout())
    }

    /// Endpoint URL pages are requested from.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %self.url, %status, "page request rejected");
            return Err(FetchError::Transport(format!("HTTP {status}")));
        }

        let bytes = response.bytes().await?;
        let body: PageBody = serde_json::from_slice(&bytes)
            .map_err(|e| FetchError::Protocol(format!("malformed page body: {e}")))?;

        tracing::debug!(
            url = %self.url,
            items = body.items.len(),
            "page received"
        );
        Ok(body.into())
    }
}
