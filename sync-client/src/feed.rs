//! Shared state of one synchronized list.
//!
//! [`Feed`] couples the pure pieces from sync-core (the [`ListStore`] and the
//! [`LoadState`] machine) with the ordering the list was fetched under, and
//! publishes a [`FeedSnapshot`] on a watch channel after every change.
//!
//! The state sits behind a `std::sync::Mutex` that is never held across an
//! `.await`; the only suspension point is the page request itself.

use pagesync_core::{project, Action, Event, FetchMode, ListStore, LoadState};
use pagesync_types::{Item, OrderSpec, Page, PageRequest};
use std::num::NonZeroU32;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::ClientError;

/// Point-in-time view of a list and its status flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    /// Items in display order.
    pub view: Vec<Item>,
    /// Ordering of `view`.
    pub order: OrderSpec,
    /// Whether a fetch is in flight.
    pub is_loading: bool,
    /// Message of the last failed fetch.
    pub error: Option<String>,
    /// Whether a load-more would issue a request.
    pub can_load_more: bool,
}

/// What a caller asked the coordinator to do.
#[derive(Debug, Clone)]
pub(crate) enum Intent {
    /// Start over, optionally under a new ordering.
    Reset(Option<OrderSpec>),
    /// Fetch the page after the stored cursor.
    Continue,
    /// Re-issue the request that failed.
    Retry,
}

/// Mutable state guarded by [`Feed`].
#[derive(Debug)]
pub(crate) struct FeedState {
    pub(crate) load: LoadState,
    pub(crate) store: ListStore,
    /// Ordering the stored items were fetched under.
    pub(crate) order: OrderSpec,
    /// Most recently issued request, replayed by retry.
    pub(crate) last_request: Option<PageRequest>,
}

impl FeedState {
    fn new(order: OrderSpec) -> Self {
        Self {
            load: LoadState::new(),
            store: ListStore::new(),
            order,
            last_request: None,
        }
    }

    /// Run an event through the state machine.
    pub(crate) fn apply(&mut self, event: Event) -> Vec<Action> {
        let (next, actions) = std::mem::take(&mut self.load).on_event(event);
        self.load = next;
        actions
    }

    /// Try to move into `Loading` for `intent`.
    ///
    /// Returns the request to issue, `None` when there is nothing to fetch,
    /// or `Busy` while another fetch is in flight.
    pub(crate) fn begin(
        &mut self,
        intent: Intent,
        limit: NonZeroU32,
    ) -> Result<Option<(FetchMode, PageRequest)>, ClientError> {
        let retrying = matches!(intent, Intent::Retry);
        let (event, planned) = match intent {
            Intent::Reset(order) => {
                let order = order.unwrap_or_else(|| self.order.clone());
                (
                    Event::FetchRequested {
                        mode: FetchMode::Reset,
                    },
                    Some(PageRequest::first(order, limit)),
                )
            }
            Intent::Continue => match self.store.continuation() {
                Some(cursor) => (
                    Event::FetchRequested {
                        mode: FetchMode::Continue,
                    },
                    Some(PageRequest::after(self.order.clone(), cursor.clone(), limit)),
                ),
                // Still ask the machine so an in-flight fetch reports Busy
                None if self.load.is_loading() => (
                    Event::FetchRequested {
                        mode: FetchMode::Continue,
                    },
                    None,
                ),
                None => return Ok(None),
            },
            Intent::Retry => (Event::RetryRequested, self.last_request.clone()),
        };

        let actions = self.apply(event);
        if actions.contains(&Action::RejectBusy) {
            return Err(ClientError::Busy);
        }
        let Some(mode) = actions.iter().find_map(|action| match action {
            Action::StartFetch { mode } => Some(*mode),
            _ => None,
        }) else {
            return if retrying {
                Err(ClientError::NothingToRetry)
            } else {
                Ok(None)
            };
        };

        let Some(request) = planned else {
            self.apply(Event::FetchAborted);
            return Err(ClientError::NothingToRetry);
        };
        self.last_request = Some(request.clone());
        Ok(Some((mode, request)))
    }

    /// Merge a fetched page and leave `Loading`.
    pub(crate) fn complete(
        &mut self,
        mode: FetchMode,
        request: &PageRequest,
        page: Page,
    ) -> Vec<Action> {
        match mode {
            FetchMode::Reset => {
                self.store.replace(page);
                self.order = request.order.clone();
            }
            FetchMode::Continue => self.store.append(page),
        }
        self.apply(Event::FetchSucceeded)
    }

    /// Record a failed fetch. Items are left untouched.
    pub(crate) fn fail(&mut self, error: String) -> Vec<Action> {
        self.apply(Event::FetchFailed { error })
    }

    pub(crate) fn can_load_more(&self) -> bool {
        self.store.can_continue() && !self.load.is_loading() && self.load.error().is_none()
    }

    pub(crate) fn view(&self) -> Vec<Item> {
        project(&self.store, &self.order)
            .into_iter()
            .cloned()
            .collect()
    }

    pub(crate) fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            view: self.view(),
            order: self.order.clone(),
            is_loading: self.load.is_loading(),
            error: self.load.error().map(str::to_string),
            can_load_more: self.can_load_more(),
        }
    }
}

/// Feed state plus the channel snapshots are published on.
#[derive(Debug)]
pub(crate) struct Feed {
    state: Mutex<FeedState>,
    updates: watch::Sender<FeedSnapshot>,
}

impl Feed {
    pub(crate) fn new(order: OrderSpec) -> Self {
        let state = FeedState::new(order);
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            state: Mutex::new(state),
            updates,
        }
    }

    /// Lock the state for reading.
    ///
    /// A poisoned lock is recovered: every mutation leaves the state
    /// consistent before it can panic.
    pub(crate) fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the state, then publish a fresh snapshot.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut FeedState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.lock();
            let result = f(&mut state);
            (result, state.snapshot())
        };
        self.updates.send_replace(snapshot);
        result
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.updates.subscribe()
    }
}
