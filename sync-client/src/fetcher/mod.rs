//! Page fetching abstraction for pagesync.
//!
//! This module provides a pluggable fetch layer that abstracts the
//! underlying data source (HTTP endpoint, mock for testing).
//!
//! # Design
//!
//! A fetcher issues exactly one request per call and never retries:
//! - `fetch_page()` sends `(order, cursor, limit)` and returns one [`Page`]
//! - failures are either [`FetchError::Transport`] or [`FetchError::Protocol`]
//!
//! Retry and caching policy belong below this boundary.
//!
//! # Example
//!
//! ```ignore
//! let fetcher = MockFetcher::new();
//! fetcher.queue_page(Page::last(items));
//! let page = fetcher.fetch_page(&request).await?;
//! ```

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::MockFetcher;

use async_trait::async_trait;
use pagesync_types::{Page, PageRequest};
use thiserror::Error;

/// Fetch errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network or HTTP-layer failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response does not match the page contract.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Protocol(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Source of pages for a cursor-paginated list.
///
/// Implementations handle the underlying request mechanism
/// (HTTP, mock, etc).
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue one request and return the page it produced.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError>;
}
