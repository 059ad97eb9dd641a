//! Single-flight page fetching.
//!
//! [`FetchCoordinator`] turns a fetch intent into at most one outstanding
//! [`PageFetcher`] call and applies the result to the shared list:
//!
//! ```text
//! intent → LoadState (sync-core) → PageFetcher → ListStore
//!              ↓ RejectBusy
//!          ClientError::Busy
//! ```
//!
//! A fetch future that is dropped mid-request leaves `Loading` through an
//! abort guard, so the in-flight flag is never stuck.

use pagesync_core::{Action, Event, FeedEvent, FetchMode};
use pagesync_types::{FieldName, OrderSpec, Page, PageRequest};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::feed::{Feed, Intent};
use crate::fetcher::{FetchError, PageFetcher};
use crate::ClientError;

/// Result of an accepted fetch intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was fetched and merged.
    Applied {
        /// Mode of the fetch.
        mode: FetchMode,
        /// Number of items in the page.
        received: usize,
    },
    /// There was nothing to fetch; no request was issued.
    Skipped,
}

/// Wraps a [`PageFetcher`] with single-flight and load/error state.
pub struct FetchCoordinator<F: PageFetcher> {
    fetcher: F,
    limit: NonZeroU32,
    feed: Arc<Feed>,
}

impl<F: PageFetcher> FetchCoordinator<F> {
    pub(crate) fn new(fetcher: F, limit: NonZeroU32, feed: Arc<Feed>) -> Self {
        Self {
            fetcher,
            limit,
            feed,
        }
    }

    /// Fetch under the current ordering.
    ///
    /// `Reset` requests the first page and replaces the list. `Continue`
    /// requests the page after the stored cursor and appends it, or returns
    /// [`FetchOutcome::Skipped`] when the server has no more pages.
    pub async fn fetch(&self, mode: FetchMode) -> Result<FetchOutcome, ClientError> {
        let intent = match mode {
            FetchMode::Reset => Intent::Reset(None),
            FetchMode::Continue => Intent::Continue,
        };
        self.run(intent).await
    }

    /// Reset the list under a new ordering.
    ///
    /// The ordering is only applied together with the first page it
    /// produced; on failure the previous ordering and items stay.
    pub async fn reset_to(&self, order: OrderSpec) -> Result<FetchOutcome, ClientError> {
        self.run(Intent::Reset(Some(order))).await
    }

    /// Re-issue the request of the last failed fetch.
    pub async fn retry(&self) -> Result<FetchOutcome, ClientError> {
        self.run(Intent::Retry).await
    }

    /// Page size used for every request.
    pub fn limit(&self) -> NonZeroU32 {
        self.limit
    }

    /// Get a reference to the underlying fetcher (for testing).
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    async fn run(&self, intent: Intent) -> Result<FetchOutcome, ClientError> {
        let begun = self
            .feed
            .update(|state| state.begin(intent, self.limit))
            .inspect_err(|e| {
                if matches!(e, ClientError::Busy) {
                    debug!("fetch rejected, another fetch is in flight");
                }
            })?;
        let Some((mode, request)) = begun else {
            debug!("nothing to fetch");
            return Ok(FetchOutcome::Skipped);
        };

        debug!(
            ?mode,
            order = %request.order,
            cursor = ?request.cursor,
            limit = request.limit.get(),
            "fetch issued"
        );

        let mut guard = InFlight::new(&self.feed);
        let result = self
            .fetcher
            .fetch_page(&request)
            .await
            .and_then(|page| check_sortable(page, &request.order.key));
        guard.disarm();

        match result {
            Ok(page) => {
                let received = page.items.len();
                debug!(received, has_more = page.has_more(), "page received");
                let actions = self
                    .feed
                    .update(|state| state.complete(mode, &request, page));
                emit(actions);
                Ok(FetchOutcome::Applied { mode, received })
            }
            Err(error) => {
                let actions = self.feed.update(|state| state.fail(error.to_string()));
                emit(actions);
                Err(error.into())
            }
        }
    }
}

/// Report the application events the load machine asked for.
fn emit(actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::EmitEvent(FeedEvent::PageApplied { mode }) => info!(?mode, "page applied"),
            Action::EmitEvent(FeedEvent::FetchFailed { mode, error }) => {
                warn!(?mode, %error, "fetch failed")
            }
            Action::StartFetch { .. } | Action::RejectBusy => {}
        }
    }
}

/// Every item must carry a sortable value for the key it is ordered by.
fn check_sortable(page: Page, key: &FieldName) -> Result<Page, FetchError> {
    if let Some(item) = page.items.iter().find(|i| i.sort_value(key).is_none()) {
        return Err(FetchError::Protocol(format!(
            "item {} has no sortable `{}` field",
            item.id, key
        )));
    }
    Ok(page)
}

/// Leaves `Loading` if the fetch future is dropped before completing.
struct InFlight<'a> {
    feed: &'a Feed,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(feed: &'a Feed) -> Self {
        Self { feed, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!("fetch dropped before completing");
            emit(self.feed.update(|state| state.apply(Event::FetchAborted)));
        }
    }
}
