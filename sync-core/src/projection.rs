//! Display ordering for pagesync.
//!
//! [`project`] derives the ordered view of a [`ListStore`] for a given
//! [`OrderSpec`]. It borrows the store read-only, so computing a view can
//! never reorder or otherwise touch the collection it is computed from.

use pagesync_types::{Item, OrderSpec};
use std::cmp::Ordering;

use crate::ListStore;

/// Ordered view of `store` under `order`.
///
/// Items compare by the value of `order.key`, flipped for descending order.
/// Ties keep insertion order (the sort is stable), so deleting one item never
/// reshuffles the others. Items without a sortable value go last, also in
/// insertion order.
pub fn project<'a>(store: &'a ListStore, order: &OrderSpec) -> Vec<&'a Item> {
    let mut view: Vec<&Item> = store.iter().collect();
    view.sort_by(|a, b| compare(a, b, order));
    view
}

fn compare(a: &Item, b: &Item, order: &OrderSpec) -> Ordering {
    match (a.sort_value(&order.key), b.sort_value(&order.key)) {
        (Some(x), Some(y)) => order.direction.apply(x.cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
