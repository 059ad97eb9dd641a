//! Mock fetcher for testing.
//!
//! Allows queueing pages and capturing issued requests for verification.

use super::{FetchError, PageFetcher};
use async_trait::async_trait;
use pagesync_types::{Page, PageRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock fetcher for testing.
///
/// Responses are served in the order they were queued. A fetch can be
/// held open with [`MockFetcher::hold_next`] to observe the in-flight state.
#[derive(Debug, Default)]
pub struct MockFetcher {
    inner: Arc<Mutex<MockFetcherInner>>,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

#[derive(Debug, Default)]
struct MockFetcherInner {
    responses: VecDeque<Result<Page, FetchError>>,
    requests: Vec<PageRequest>,
    fail_next: Option<FetchError>,
    hold_next: bool,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a page to be returned by a future `fetch_page()` call.
    pub fn queue_page(&self, page: Page) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push_back(Ok(page));
    }

    /// Queue an error to be returned by a future `fetch_page()` call.
    pub fn queue_error(&self, error: FetchError) {
        let mut inner = self.inner.lock().unwrap();
        inner.responses.push_back(Err(error));
    }

    /// Cause the next fetch to fail with a transport error, ahead of the queue.
    pub fn fail_next_transport(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next = Some(FetchError::Transport(error.to_string()));
    }

    /// Cause the next fetch to fail with a protocol error, ahead of the queue.
    pub fn fail_next_protocol(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next = Some(FetchError::Protocol(error.to_string()));
    }

    /// Get all requests that were issued.
    pub fn requests(&self) -> Vec<PageRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Get the last request that was issued.
    pub fn last_request(&self) -> Option<PageRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.last().cloned()
    }

    /// Number of requests issued so far.
    pub fn request_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.requests.len()
    }

    /// Number of queued responses not yet served.
    pub fn pending(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.responses.len()
    }

    /// Keep the next fetch in flight until [`release`](Self::release).
    pub fn hold_next(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.hold_next = true;
    }

    /// Wait until a held fetch has been issued.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Let a held fetch complete.
    pub fn release(&self) {
        self.release.notify_one();
    }

    /// Clear all state (queue, recorded requests, pending failures).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockFetcherInner::default();
    }
}

impl Clone for MockFetcher {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            started: Arc::clone(&self.started),
            release: Arc::clone(&self.release),
        }
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        let (response, hold) = {
            let mut inner = self.inner.lock().unwrap();
            inner.requests.push(request.clone());

            // Forced failure wins over the queue
            let response = match inner.fail_next.take() {
                Some(error) => Err(error),
                None => inner
                    .responses
                    .pop_front()
                    .unwrap_or_else(|| Err(FetchError::Transport("no queued response".into()))),
            };
            (response, std::mem::take(&mut inner.hold_next))
        };

        if hold {
            self.started.notify_one();
            self.release.notified().await;
        }

        response
    }
}
