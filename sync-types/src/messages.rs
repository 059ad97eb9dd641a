//! Page request and response types.
//!
//! [`PageRequest`] and [`Page`] are what the engine works with.
//! [`PageBody`] is the JSON shape the server sends:
//!
//! ```text
//! { "items": [ ... ], "paging": { "nextCursor": "c1" | null } }
//! ```

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use crate::{Cursor, Item, OrderSpec};

/// One bounded request for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Ordering the server should paginate by.
    pub order: OrderSpec,
    /// Where to resume; `None` asks for the first page.
    pub cursor: Option<Cursor>,
    /// Maximum number of items in the page.
    pub limit: NonZeroU32,
}

impl PageRequest {
    /// Request the first page.
    pub fn first(order: OrderSpec, limit: NonZeroU32) -> Self {
        Self {
            order,
            cursor: None,
            limit,
        }
    }

    /// Request the page following `cursor`.
    pub fn after(order: OrderSpec, cursor: Cursor, limit: NonZeroU32) -> Self {
        Self {
            order,
            cursor: Some(cursor),
            limit,
        }
    }

    /// Query-string pairs: `order`, `cursor` (empty for the first page) and
    /// `limit`.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("order", self.order.key.to_string()),
            (
                "cursor",
                self.cursor
                    .as_ref()
                    .map(|c| c.as_str().to_string())
                    .unwrap_or_default(),
            ),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// A page of items plus the cursor of the page after it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    /// Items in server order.
    pub items: Vec<Item>,
    /// Cursor of the next page; `None` when the server has no more pages.
    pub next_cursor: Option<Cursor>,
}

impl Page {
    /// Create a page.
    pub fn new(items: Vec<Item>, next_cursor: Option<Cursor>) -> Self {
        Self { items, next_cursor }
    }

    /// A page that ends the list.
    pub fn last(items: Vec<Item>) -> Self {
        Self::new(items, None)
    }

    /// Whether the server reported further pages.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Response body of the page endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBody {
    /// Items in server order.
    pub items: Vec<Item>,
    /// Pagination metadata.
    pub paging: Paging,
}

/// Pagination metadata of a [`PageBody`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Token of the next page, `null` at the end of the list.
    #[serde(default, alias = "next_cursor")]
    pub next_cursor: Option<Cursor>,
    /// Explicit end-of-list flag, sent by some servers.
    #[serde(default, alias = "has_more", skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
}

/// An explicit `hasMore: false` wins over a cursor, and an empty cursor
/// counts as no cursor.
impl From<PageBody> for Page {
    fn from(body: PageBody) -> Self {
        let next_cursor = match body.paging.has_more {
            Some(false) => None,
            _ => body.paging.next_cursor.filter(|c| !c.as_str().is_empty()),
        };
        Self {
            items: body.items,
            next_cursor,
        }
    }
}

impl From<Page> for PageBody {
    fn from(page: Page) -> Self {
        Self {
            items: page.items,
            paging: Paging {
                next_cursor: page.next_cursor,
                has_more: None,
            },
        }
    }
}
