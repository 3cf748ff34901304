//! Fixed-capacity most-recently-used list of viewed products.

use crate::model::{ProductId, ViewedProduct};

/// Number of products kept in the recently-viewed list.
pub const RECENTLY_VIEWED_CAPACITY: usize = 4;

/// Recency-ordered list, newest first, unique by product id, never longer than its capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentlyViewedList {
    entries: Vec<ViewedProduct>,
    capacity: usize,
}

impl Default for RecentlyViewedList {
    fn default() -> Self {
        Self::with_capacity(RECENTLY_VIEWED_CAPACITY)
    }
}

impl RecentlyViewedList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Builds a list from stored entries: orders by `viewed_at` descending (stable for ties),
    /// keeps the newest entry per product, and evicts beyond capacity.
    pub fn from_entries(entries: Vec<ViewedProduct>) -> Self {
        let mut list = Self::default();
        let mut sorted = entries;
        sorted.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));
        for entry in sorted {
            if !list.contains(entry.product_id) {
                list.entries.push(entry);
            }
        }
        list.evict_overflow();
        list
    }

    pub fn entries(&self) -> &[ViewedProduct] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|entry| entry.product_id == product_id)
    }

    /// Newest `viewed_at` in the list.
    pub fn newest_viewed_at(&self) -> Option<u64> {
        self.entries.iter().map(|entry| entry.viewed_at).max()
    }

    /// Moves `product` to the front, replacing any entry with the same id, then evicts.
    ///
    /// Returns the entries evicted to respect capacity (oldest last).
    pub fn promote(&mut self, product: ViewedProduct) -> Vec<ViewedProduct> {
        self.entries
            .retain(|entry| entry.product_id != product.product_id);
        self.entries.insert(0, product);
        self.evict_overflow()
    }

    /// Drops tail entries beyond capacity and returns them.
    pub fn evict_overflow(&mut self) -> Vec<ViewedProduct> {
        if self.entries.len() <= self.capacity {
            return Vec::new();
        }
        self.entries.split_off(self.capacity)
    }
}
