//! # sync-core
//!
//! Pure logic for pagesync (no I/O, instant tests).
//!
//! This crate implements the list store, the view projection and the fetch
//! state machine without any network I/O, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (HTTP requests) is performed by `sync-client`, which
//! interprets the actions produced by these state machines.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod projection;
pub mod state;
pub mod store;

pub use projection::project;
pub use state::{Action, Event, FeedEvent, FetchMode, LoadState};
pub use store::ListStore;
