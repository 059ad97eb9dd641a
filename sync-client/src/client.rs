//! Controller - the main interface for pagesync.
//!
//! This module provides [`Controller`], the composition root applications
//! drive a synchronized list through.
//!
//! # Architecture
//!
//! Controller forwards fetch intents to a [`FetchCoordinator`], applies local
//! deletes directly to the list, and derives the display order on read:
//!
//! ```text
//! Application → Controller → FetchCoordinator → PageFetcher → Network
//!                   ↓                ↓
//!              project()    sync-core (ListStore, LoadState)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pagesync_client::{Controller, HttpFetcher, ClientConfig};
//!
//! let config = ClientConfig::from_file("pagesync.toml".as_ref())?;
//! let controller = Controller::from_config(HttpFetcher::from_config(&config)?, &config)?;
//!
//! controller.start().await?;
//! if controller.can_load_more() {
//!     controller.load_more().await?;
//! }
//! for item in controller.view() {
//!     println!("{}", item.id);
//! }
//! ```

use pagesync_core::{FetchMode, LoadState};
use pagesync_types::{Item, ItemId, OrderPreset, OrderSpec};
use std::num::NonZeroU32;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::{ClientConfig, ConfigError};
use crate::coordinator::{FetchCoordinator, FetchOutcome};
use crate::feed::{Feed, FeedSnapshot};
use crate::fetcher::{FetchError, PageFetcher};

/// Client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Another fetch is in flight. Not a failure of the list itself.
    #[error("a fetch is already in flight")]
    Busy,

    /// The fetch failed; the list keeps its previous items.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Retry was requested without a failed fetch to re-issue.
    #[error("no failed fetch to retry")]
    NothingToRetry,
}

/// The list controller.
///
/// Owns the list, its ordering and its fetch state. All methods take
/// `&self`, so a controller can be shared between tasks behind an `Arc`.
pub struct Controller<F: PageFetcher> {
    coordinator: FetchCoordinator<F>,
    feed: Arc<Feed>,
}

impl<F: PageFetcher> Controller<F> {
    /// Create a controller with an initial ordering and page size.
    ///
    /// Nothing is fetched until [`start`](Self::start) or an intent.
    pub fn new(fetcher: F, order: OrderSpec, limit: NonZeroU32) -> Self {
        let feed = Arc::new(Feed::new(order));
        Self {
            coordinator: FetchCoordinator::new(fetcher, limit, Arc::clone(&feed)),
            feed,
        }
    }

    /// Create a controller from the `[paging]` section of a config.
    pub fn from_config(fetcher: F, config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let limit = config.page_limit().map_err(|e| ConfigError::Invalid {
            field: "paging.limit",
            reason: e.to_string(),
        })?;
        Ok(Self::new(fetcher, config.paging.order.clone(), limit))
    }

    /// Fetch the first page under the current ordering.
    pub async fn start(&self) -> Result<FetchOutcome, ClientError> {
        info!(order = %self.order(), "starting list");
        self.coordinator.fetch(FetchMode::Reset).await
    }

    /// Change the ordering and reload from the first page.
    ///
    /// Always resets, even when `order` equals the current ordering.
    pub async fn set_order(&self, order: OrderSpec) -> Result<FetchOutcome, ClientError> {
        info!(%order, "order changed");
        self.coordinator.reset_to(order).await
    }

    /// Change the ordering to one of the named presets.
    pub async fn apply_preset(&self, preset: OrderPreset) -> Result<FetchOutcome, ClientError> {
        self.set_order(preset.spec()).await
    }

    /// Append the next page.
    ///
    /// Returns [`FetchOutcome::Skipped`] when there is no next page or the
    /// last fetch failed (use [`retry`](Self::retry) instead).
    pub async fn load_more(&self) -> Result<FetchOutcome, ClientError> {
        debug!("load more requested");
        self.coordinator.fetch(FetchMode::Continue).await
    }

    /// Remove an item locally, without a server round trip.
    ///
    /// Returns whether the item was present. Never fails, also while a
    /// fetch is in flight.
    pub fn delete(&self, id: &ItemId) -> bool {
        let removed = self.feed.update(|state| state.store.remove(id));
        debug!(%id, removed, "local delete");
        removed
    }

    /// Re-issue exactly the request that failed last.
    pub async fn retry(&self) -> Result<FetchOutcome, ClientError> {
        debug!("retry requested");
        self.coordinator.retry().await
    }

    /// Items in display order.
    pub fn view(&self) -> Vec<Item> {
        self.feed.lock().view()
    }

    /// Check if a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.feed.lock().load.is_loading()
    }

    /// Message of the last failed fetch, cleared by the next success.
    pub fn error(&self) -> Option<String> {
        self.feed.lock().load.error().map(str::to_string)
    }

    /// Whether [`load_more`](Self::load_more) would issue a request.
    pub fn can_load_more(&self) -> bool {
        self.feed.lock().can_load_more()
    }

    /// Ordering of the current view.
    pub fn order(&self) -> OrderSpec {
        self.feed.lock().order.clone()
    }

    /// Current fetch lifecycle state.
    pub fn state(&self) -> LoadState {
        self.feed.lock().load.clone()
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.feed.lock().store.len()
    }

    /// Check if no items are held.
    pub fn is_empty(&self) -> bool {
        self.feed.lock().store.is_empty()
    }

    /// View plus status flags, read atomically.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.feed.lock().snapshot()
    }

    /// Watch for snapshots. A new one is published after every change.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.feed.subscribe()
    }

    /// Get a reference to the underlying fetcher (for testing).
    pub fn fetcher(&self) -> &F {
        self.coordinator.fetcher()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::MockFetcher;
    use pagesync_types::{Cursor, Page};
    use std::time::Duration;

    fn item(id: i64, t: i64) -> Item {
        Item::new(id).with_field("t", t)
    }

    fn ids(controller: &Controller<MockFetcher>) -> Vec<i64> {
        controller
            .view()
            .into_iter()
            .map(|item| match item.id {
                ItemId::Int(v) => v,
                ItemId::Text(_) => panic!("expected integer ids"),
            })
            .collect()
    }

    /// Controller ordered by `t` descending, pages of two.
    fn controller(fetcher: &MockFetcher) -> Controller<MockFetcher> {
        Controller::new(
            fetcher.clone(),
            OrderSpec::descending("t"),
            NonZeroU32::new(2).unwrap(),
        )
    }

    fn first_page() -> Page {
        Page::new(vec![item(1, 10), item(2, 20)], Some(Cursor::new("c1")))
    }

    // ===========================================
    // Pagination
    // ===========================================

    #[tokio::test]
    async fn first_page_then_load_more() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(first_page());
        fetcher.queue_page(Page::last(vec![item(3, 5)]));
        let controller = controller(&fetcher);

        controller.start().await.unwrap();
        assert_eq!(ids(&controller), vec![2, 1]);
        assert!(controller.can_load_more());
        assert!(!controller.is_loading());

        controller.load_more().await.unwrap();
        assert_eq!(ids(&controller), vec![2, 1, 3]);
        assert!(!controller.can_load_more());
        assert_eq!(controller.state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn load_more_at_end_issues_no_request() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(Page::last(vec![item(1, 1)]));
        let controller = controller(&fetcher);

        controller.start().await.unwrap();
        let outcome = controller.load_more().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Skipped);
        assert_eq!(fetcher.request_count(), 1);
    }

    #[tokio::test]
    async fn repeated_id_across_pages_updates_in_place() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(first_page());
        fetcher.queue_page(Page::last(vec![item(1, 30)]));
        let controller = controller(&fetcher);

        controller.start().await.unwrap();
        controller.load_more().await.unwrap();

        assert_eq!(controller.len(), 2);
        assert_eq!(ids(&controller), vec![1, 2]);
    }

    // ===========================================
    // Failure and retry
    // ===========================================

    #[tokio::test]
    async fn failed_load_more_keeps_view_and_retries_same_request() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(first_page());
        let controller = controller(&fetcher);
        controller.start().await.unwrap();

        fetcher.fail_next_transport("network down");
        let err = controller.load_more().await.unwrap_err();

        assert_eq!(
            err,
            ClientError::Fetch(FetchError::Transport("network down".into()))
        );
        assert_eq!(ids(&controller), vec![2, 1]);
        assert!(controller.error().unwrap().contains("network down"));
        assert!(!controller.is_loading());
        assert!(!controller.can_load_more());

        // Load-more stays disabled until the failure is resolved
        assert_eq!(controller.load_more().await.unwrap(), FetchOutcome::Skipped);
        assert_eq!(fetcher.request_count(), 2);

        fetcher.queue_page(Page::last(vec![item(3, 5)]));
        controller.retry().await.unwrap();

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2], requests[1]);
        assert_eq!(ids(&controller), vec![2, 1, 3]);
        assert!(controller.error().is_none());
    }

    #[tokio::test]
    async fn protocol_failure_keeps_view() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(first_page());
        let controller = controller(&fetcher);
        controller.start().await.unwrap();

        fetcher.fail_next_protocol("missing items array");
        let err = controller.load_more().await.unwrap_err();

        assert_eq!(
            err,
            ClientError::Fetch(FetchError::Protocol("missing items array".into()))
        );
        assert_eq!(ids(&controller), vec![2, 1]);
        assert!(controller.error().unwrap().contains("missing items array"));
        assert!(!controller.can_load_more());
    }

    #[tokio::test]
    async fn aborted_load_more_retries_cursor_request() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(first_page());
        fetcher.queue_page(Page::last(vec![item(9, 9)]));
        let controller = controller(&fetcher);
        controller.start().await.unwrap();

        fetcher.hold_next();
        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), controller.load_more()).await;
        assert!(timed_out.is_err());

        assert!(!controller.is_loading());
        assert_eq!(controller.error().as_deref(), Some("fetch aborted"));
        assert_eq!(ids(&controller), vec![2, 1]);

        fetcher.queue_page(Page::last(vec![item(3, 5)]));
        controller.retry().await.unwrap();

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2], requests[1]);
        assert_eq!(requests[2].cursor, Some(Cursor::new("c1")));
        assert_eq!(ids(&controller), vec![2, 1, 3]);
        assert!(controller.error().is_none());
    }

    #[tokio::test]
    async fn retry_without_failure_is_rejected() {
        let fetcher = MockFetcher::new();
        let controller = controller(&fetcher);

        assert_eq!(
            controller.retry().await.unwrap_err(),
            ClientError::NothingToRetry
        );
        assert_eq!(fetcher.request_count(), 0);
    }

    #[tokio::test]
    async fn failed_order_change_keeps_previous_view() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(first_page());
        let controller = controller(&fetcher);
        controller.start().await.unwrap();

        fetcher.fail_next_transport("network down");
        assert!(controller.set_order(OrderSpec::ascending("t")).await.is_err());

        assert_eq!(controller.order(), OrderSpec::descending("t"));
        assert_eq!(ids(&controller), vec![2, 1]);
    }

    // ===========================================
    // Ordering
    // ===========================================

    #[tokio::test]
    async fn set_order_always_resets() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(first_page());
        fetcher.queue_page(Page::last(vec![item(4, 1), item(5, 2)]));
        let controller = controller(&fetcher);
        controller.start().await.unwrap();

        controller
            .set_order(OrderSpec::descending("t"))
            .await
            .unwrap();

        assert_eq!(ids(&controller), vec![5, 4]);
        let last = fetcher.last_request().unwrap();
        assert_eq!(last.cursor, None);
        assert_eq!(last.order, OrderSpec::descending("t"));
    }

    #[tokio::test]
    async fn set_order_recomputes_continuation_from_first_page() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(Page::last(vec![item(1, 10)]));
        fetcher.queue_page(Page::new(vec![item(2, 1), item(3, 2)], Some(Cursor::new("a1"))));
        fetcher.queue_page(Page::last(vec![item(4, 3)]));
        let controller = controller(&fetcher);

        controller.start().await.unwrap();
        assert!(!controller.can_load_more());

        controller.set_order(OrderSpec::ascending("t")).await.unwrap();
        assert!(controller.can_load_more());
        assert_eq!(ids(&controller), vec![2, 3]);

        controller.load_more().await.unwrap();
        assert_eq!(fetcher.last_request().unwrap().cursor, Some(Cursor::new("a1")));
        assert_eq!(ids(&controller), vec![2, 3, 4]);
        assert!(!controller.can_load_more());

        fetcher.queue_page(Page::new(vec![item(5, 0)], Some(Cursor::new("d1"))));
        controller.set_order(OrderSpec::descending("t")).await.unwrap();
        assert!(controller.can_load_more());
        assert_eq!(ids(&controller), vec![5]);
    }

    #[tokio::test]
    async fn preset_changes_key_and_direction() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(Page::last(vec![
            Item::new(1).with_field("rating", 3),
            Item::new(2).with_field("rating", 5),
            Item::new(3).with_field("rating", 1),
        ]));
        let controller = controller(&fetcher);

        controller.apply_preset(OrderPreset::Worst).await.unwrap();

        assert_eq!(controller.order(), OrderPreset::Worst.spec());
        assert_eq!(ids(&controller), vec![3, 1, 2]);
        assert_eq!(
            fetcher.last_request().unwrap().order.key.as_str(),
            OrderPreset::RATING
        );
    }

    // ===========================================
    // Local delete
    // ===========================================

    #[tokio::test]
    async fn delete_removes_locally_and_is_idempotent() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(Page::last(vec![item(1, 30), item(2, 20), item(3, 10)]));
        let controller = controller(&fetcher);
        controller.start().await.unwrap();

        assert!(controller.delete(&ItemId::from(2)));
        assert_eq!(ids(&controller), vec![1, 3]);

        assert!(!controller.delete(&ItemId::from(999)));
        assert!(!controller.delete(&ItemId::from(2)));
        assert_eq!(ids(&controller), vec![1, 3]);
        assert_eq!(fetcher.request_count(), 1);
    }

    // ===========================================
    // Concurrency
    // ===========================================

    #[tokio::test]
    async fn load_more_while_loading_is_busy() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(first_page());
        fetcher.queue_page(Page::last(vec![item(3, 5)]));
        let controller = controller(&fetcher);
        controller.start().await.unwrap();

        fetcher.hold_next();
        let (first, second) = tokio::join!(controller.load_more(), async {
            fetcher.wait_started().await;
            assert!(controller.is_loading());
            assert!(!controller.can_load_more());
            let second = controller.load_more().await;
            fetcher.release();
            second
        });

        assert!(first.is_ok());
        assert_eq!(second, Err(ClientError::Busy));
        assert_eq!(fetcher.request_count(), 2);
        assert!(controller.error().is_none());
    }

    #[tokio::test]
    async fn delete_during_fetch_is_applied() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(first_page());
        fetcher.queue_page(Page::last(vec![item(3, 5)]));
        let controller = controller(&fetcher);
        controller.start().await.unwrap();

        fetcher.hold_next();
        let (result, ()) = tokio::join!(controller.load_more(), async {
            fetcher.wait_started().await;
            assert!(controller.delete(&ItemId::from(1)));
            fetcher.release();
        });

        result.unwrap();
        assert_eq!(ids(&controller), vec![2, 3]);
    }

    // ===========================================
    // Snapshots
    // ===========================================

    #[tokio::test]
    async fn subscribers_see_every_change() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(first_page());
        let controller = controller(&fetcher);
        let mut rx = controller.subscribe();

        assert!(rx.borrow_and_update().view.is_empty());

        controller.start().await.unwrap();
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot, controller.snapshot());
        assert_eq!(snapshot.view.len(), 2);
        assert!(snapshot.can_load_more);

        controller.delete(&ItemId::from(1));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().view.len(), 1);
    }

    #[tokio::test]
    async fn from_config_uses_paging_section() {
        let fetcher = MockFetcher::new();
        fetcher.queue_page(Page::default());
        let config = ClientConfig::default()
            .with_limit(7)
            .with_order(OrderPreset::Oldest.spec());

        let controller = Controller::from_config(fetcher.clone(), &config).unwrap();
        controller.start().await.unwrap();

        let request = fetcher.last_request().unwrap();
        assert_eq!(request.limit.get(), 7);
        assert_eq!(request.order, OrderPreset::Oldest.spec());
        assert!(controller.is_empty());
    }

    #[test]
    fn from_config_rejects_zero_limit() {
        let config = ClientConfig::default().with_limit(0);
        assert!(Controller::from_config(MockFetcher::new(), &config).is_err());
    }
}
