//! Insertion Order Module
//!
//! Tracks the order in which keys were written, for FIFO eviction.

use std::collections::VecDeque;

// == Insertion Order ==
/// Tracks write order of keys.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest write
/// - Back = Newest write
///
/// Reads never reorder keys; only a rewrite moves a key to the back.
#[derive(Debug, Clone)]
pub struct InsertionOrder<K> {
    order: VecDeque<K>,
}

impl<K> Default for InsertionOrder<K> {
    fn default() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }
}

impl<K: PartialEq + Clone> InsertionOrder<K> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Records a write of `key` as the newest.
    ///
    /// A key that was already tracked is moved to the back.
    pub fn push(&mut self, key: K) {
        self.remove(&key);
        self.order.push_back(key);
    }

    // == Remove ==
    /// Stops tracking `key`. Returns whether it was tracked.
    pub fn remove(&mut self, key: &K) -> bool {
        let before = self.order.len();
        self.order.retain(|k| k != key);
        self.order.len() != before
    }

    // == Oldest ==
    /// Returns up to `count` keys, oldest first, without removing them.
    pub fn oldest(&self, count: usize) -> Vec<K> {
        self.order.iter().take(count).cloned().collect()
    }

    /// Iterates keys oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
