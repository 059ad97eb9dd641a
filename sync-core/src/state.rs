//! Load state machine for pagesync.
//!
//! This module provides a pure, side-effect-free state machine for the fetch
//! lifecycle of one list. The state machine takes events as input and
//! produces a new state plus a list of actions to execute.
//!
//! Single-flight lives here: while a fetch is `Loading`, any further fetch
//! request is answered with [`Action::RejectBusy`] instead of a second
//! [`Action::StartFetch`], so two concurrent fetches cannot be expressed.
//!
//! The actual I/O is performed by sync-client, not by this module.

/// What a fetch does with the page it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMode {
    /// Start over from the first page and replace the list.
    Reset,
    /// Request the page after the stored cursor and append it.
    Continue,
}

/// Fetch lifecycle state - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading {
        /// Mode of the in-flight fetch.
        mode: FetchMode,
    },
    /// The last fetch succeeded.
    Loaded,
    /// The last fetch failed; existing items are untouched.
    Failed {
        /// Mode of the failed fetch, re-issued on retry.
        mode: FetchMode,
        /// Displayable failure message.
        error: String,
    },
}

impl LoadState {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (sync-client)
    /// is responsible for executing the returned actions.
    pub fn on_event(self, event: Event) -> (Self, Vec<Action>) {
        match (self, event) {
            // Single-flight guard
            (Self::Loading { mode }, Event::FetchRequested { .. } | Event::RetryRequested) => {
                (Self::Loading { mode }, vec![Action::RejectBusy])
            }

            // Load-more stays disabled until a failure is resolved
            (state @ Self::Failed { .. }, Event::FetchRequested { mode: FetchMode::Continue }) => {
                (state, vec![])
            }

            (Self::Idle | Self::Loaded | Self::Failed { .. }, Event::FetchRequested { mode }) => {
                (Self::Loading { mode }, vec![Action::StartFetch { mode }])
            }

            // Retry re-issues the failed fetch
            (Self::Failed { mode, .. }, Event::RetryRequested) => {
                (Self::Loading { mode }, vec![Action::StartFetch { mode }])
            }

            // From Loading
            (Self::Loading { mode }, Event::FetchSucceeded) => (
                Self::Loaded,
                vec![Action::EmitEvent(FeedEvent::PageApplied { mode })],
            ),
            (Self::Loading { mode }, Event::FetchFailed { error }) => (
                Self::Failed {
                    mode,
                    error: error.clone(),
                },
                vec![Action::EmitEvent(FeedEvent::FetchFailed { mode, error })],
            ),
            (Self::Loading { mode }, Event::FetchAborted) => {
                let error = "fetch aborted".to_string();
                (
                    Self::Failed {
                        mode,
                        error: error.clone(),
                    },
                    vec![Action::EmitEvent(FeedEvent::FetchFailed { mode, error })],
                )
            }

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Failure message of the last fetch, if it failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Events that can occur in the fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A reset or load-more was requested.
    FetchRequested {
        /// Requested mode.
        mode: FetchMode,
    },
    /// Retry of the last failed fetch was requested.
    RetryRequested,
    /// The in-flight fetch returned a page and it was applied.
    FetchSucceeded,
    /// The in-flight fetch failed.
    FetchFailed {
        /// Error message describing the failure.
        error: String,
    },
    /// The in-flight fetch was dropped before completing.
    FetchAborted,
}

/// Actions to be executed by the sync-client.
///
/// These are instructions, not side effects. The sync-client interprets
/// these and performs the actual I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Issue a page request.
    StartFetch {
        /// Mode of the fetch to issue.
        mode: FetchMode,
    },
    /// Refuse the request because a fetch is already in flight.
    RejectBusy,
    /// Emit an event to the application.
    EmitEvent(FeedEvent),
}

/// Events emitted to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// A page was fetched and merged.
    PageApplied {
        /// Mode of the completed fetch.
        mode: FetchMode,
    },
    /// A fetch failed.
    FetchFailed {
        /// Mode of the failed fetch.
        mode: FetchMode,
        /// Error message describing the failure.
        error: String,
    },
}
