//! Built-in sample data for `list --mock`.
//!
//! Food review records served by a [`MockFetcher`] the way a paginating
//! server would: sorted by the requested key, cut into pages, each page
//! pointing at the next with a cursor.

use pagesync_client::MockFetcher;
use pagesync_core::{project, ListStore};
use pagesync_types::{Cursor, Item, OrderSpec, Page};
use std::num::NonZeroU32;

/// Default page size of the sample data.
pub const PAGE_SIZE: u32 = 2;

/// (id, title, calorie, createdAt in epoch millis, rating)
const FOODS: &[(i64, &str, u32, i64, u8)] = &[
    (1, "Bibimbap", 560, 1_704_067_200_000, 5),
    (2, "Kimchi stew", 320, 1_704_153_600_000, 4),
    (3, "Tteokbokki", 480, 1_704_240_000_000, 3),
    (4, "Bulgogi", 610, 1_704_326_400_000, 5),
    (5, "Japchae", 430, 1_704_412_800_000, 2),
    (6, "Naengmyeon", 450, 1_704_499_200_000, 4),
    (7, "Samgyetang", 900, 1_704_585_600_000, 3),
];

/// The sample records, in creation order.
pub fn foods() -> Vec<Item> {
    FOODS
        .iter()
        .map(|&(id, title, calorie, created_at, rating)| {
            Item::new(id)
                .with_field("title", title)
                .with_field("calorie", calorie)
                .with_field("createdAt", created_at)
                .with_field("rating", rating)
        })
        .collect()
}

/// A fetcher that serves the sample records under `order`, `limit` per page.
pub fn fetcher(order: &OrderSpec, limit: NonZeroU32) -> MockFetcher {
    let mut all = ListStore::new();
    all.replace(Page::last(foods()));
    let sorted: Vec<Item> = project(&all, order).into_iter().cloned().collect();

    let fetcher = MockFetcher::new();
    let pages: Vec<&[Item]> = sorted.chunks(limit.get() as usize).collect();
    for (n, chunk) in pages.iter().enumerate() {
        let next = (n + 1 < pages.len()).then(|| Cursor::new(format!("page-{}", n + 2)));
        fetcher.queue_page(Page::new(chunk.to_vec(), next));
    }
    fetcher
}
