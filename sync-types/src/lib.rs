//! # sync-types
//!
//! Data model and wire format types for pagesync.
//!
//! This crate provides the foundational types used across all pagesync crates:
//! - [`ItemId`], [`Cursor`], [`FieldName`] - Identity and pagination tokens
//! - [`Item`], [`SortValue`] - List records and the values they sort by
//! - [`OrderSpec`], [`Direction`], [`OrderPreset`] - Active ordering
//! - [`PageRequest`], [`Page`], [`PageBody`] - One page request and response
//! - [`TypesError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod item;
mod messages;
mod order;

pub use error::TypesError;
pub use ids::{Cursor, FieldName, ItemId};
pub use item::{Item, SortValue};
pub use messages::{Page, PageBody, PageRequest, Paging};
pub use order::{Direction, OrderPreset, OrderSpec};
