//! Merged item collection for pagesync.
//!
//! This module holds the items fetched so far, keyed by identifier, with:
//! - Insertion order preserved across pages
//! - Overwrite-in-place when a page repeats an identifier
//! - Pagination position (`cursor`) tracked separately from `has_more`
//!
//! A `None` cursor alone cannot tell "nothing requested yet" apart from
//! "the server has no more pages", so `has_more` is stored explicitly.

use indexmap::IndexMap;
use pagesync_types::{Cursor, Item, ItemId, Page};

/// Insertion-ordered collection of fetched items plus pagination state.
#[derive(Debug, Clone)]
pub struct ListStore {
    /// Items keyed by id, in the order they were first inserted.
    items: IndexMap<ItemId, Item>,
    /// Cursor of the next page to request.
    cursor: Option<Cursor>,
    /// Whether the server may have more pages.
    has_more: bool,
}

impl ListStore {
    /// Create an empty store. `has_more` starts `true` until a page says
    /// otherwise.
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            cursor: None,
            has_more: true,
        }
    }

    /// Discard everything and load `page` as the new first page.
    pub fn replace(&mut self, page: Page) {
        self.items.clear();
        self.append(page);
    }

    /// Merge the next page.
    ///
    /// An item whose id is already present overwrites the stored one in
    /// place: fresh contents, original position.
    pub fn append(&mut self, page: Page) {
        let Page { items, next_cursor } = page;
        for item in items {
            self.items.insert(item.id.clone(), item);
        }
        self.has_more = next_cursor.is_some();
        self.cursor = next_cursor;
    }

    /// Remove an item locally. Returns whether it was present.
    ///
    /// Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        self.items.shift_remove(id).is_some()
    }

    /// Reset to the freshly created state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Look up an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// Check whether an item is present.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Item> + '_ {
        self.items.values()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cursor of the next page, if one was handed out.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Whether the server may have more pages.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Cursor to continue from, only when a following page can exist.
    pub fn continuation(&self) -> Option<&Cursor> {
        self.cursor.as_ref().filter(|_| self.has_more)
    }

    /// Whether a continue fetch has something to ask for.
    pub fn can_continue(&self) -> bool {
        self.continuation().is_some()
    }
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new()
    }
}
