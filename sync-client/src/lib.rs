//! # sync-client
//!
//! Client library for pagesync cursor-paginated list synchronization.
//!
//! This is the main library that applications use to keep a list in sync
//! with a paginated HTTP endpoint.
//!
//! ## Features
//!
//! - **Single-Flight Fetching**: At most one page request in flight per list
//! - **Local Reconciliation**: Overwrite-by-id merging and local deletes
//! - **Fetcher Abstraction**: Pluggable page source (HTTP, mock)
//! - **Pure State Machine**: Uses sync-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use pagesync_client::{Controller, HttpFetcher, OrderPreset};
//!
//! let fetcher = HttpFetcher::new("https://example.com/api/foods", timeout)?;
//! let controller = Controller::new(fetcher, OrderPreset::Newest.spec(), limit);
//!
//! controller.start().await?;
//! controller.load_more().await?;
//! controller.apply_preset(OrderPreset::Best).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod coordinator;
mod feed;
pub mod fetcher;

pub use client::{ClientError, Controller};
pub use config::{ClientConfig, ConfigError, EndpointConfig, PagingConfig};
pub use coordinator::{FetchCoordinator, FetchOutcome};
pub use feed::FeedSnapshot;
pub use fetcher::{FetchError, HttpFetcher, MockFetcher, PageFetcher};

pub use pagesync_core::{FetchMode, LoadState};
pub use pagesync_types::{Direction, Item, ItemId, OrderPreset, OrderSpec, Page, PageRequest};
