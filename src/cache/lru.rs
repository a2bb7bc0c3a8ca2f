//! LRU Module
//!
//! Recency bookkeeping for cache eviction.

use std::collections::{BTreeMap, HashMap};

// == Recency Index ==
/// Tracks the order in which keys were last used.
///
/// Every touch stamps the key with a monotonically increasing tick; the
/// smallest tick is the least recently used key. Both maps always hold the
/// same set of keys.
#[derive(Debug, Default)]
pub struct RecencyIndex {
    next_tick: u64,
    /// key -> tick of its last use
    ticks: HashMap<String, u64>,
    /// tick -> key, ordered oldest first
    order: BTreeMap<u64, String>,
}

impl RecencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks `key` as the most recently used, adding it if unknown.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        match self.ticks.get_mut(key) {
            Some(old) => {
                self.order.remove(&*old);
                *old = tick;
            }
            None => {
                self.ticks.insert(key.to_owned(), tick);
            }
        }
        self.order.insert(tick, key.to_owned());
    }

    // == Remove ==
    /// Forgets `key`. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Pop LRU ==
    /// Removes and returns the least recently used key.
    pub fn pop_lru(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_lru(&self) -> Option<&str> {
        self.order.values().next().map(String::as_str)
    }

    /// Keys ordered from most to least recently used.
    pub fn iter_mru(&self) -> impl Iterator<Item = &str> {
        self.order.values().rev().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_index_is_empty() {
        let index = RecencyIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.peek_lru(), None);
    }

    #[test]
    fn test_first_touched_is_lru() {
        let mut index = RecencyIndex::new();
        index.touch("a");
        index.touch("b");
        index.touch("c");

        assert_eq!(index.len(), 3);
        assert_eq!(index.peek_lru(), Some("a"));
    }

    #[test]
    fn test_retouch_moves_to_mru() {
        let mut index = RecencyIndex::new();
        index.touch("a");
        index.touch("b");
        index.touch("c");
        index.touch("a");

        assert_eq!(index.len(), 3);
        assert_eq!(index.iter_mru().collect::<Vec<_>>(), vec!["a", "c", "b"]);
        assert_eq!(index.pop_lru(), Some("b".to_string()));
        assert_eq!(index.pop_lru(), Some("c".to_string()));
        assert_eq!(index.pop_lru(), Some("a".to_string()));
        assert_eq!(index.pop_lru(), None);
    }

    #[test]
    fn test_remove_known_and_unknown() {
        let mut index = RecencyIndex::new();
        index.touch("a");
        index.touch("b");

        index.remove("a");
        index.remove("missing");

        assert_eq!(index.len(), 1);
        assert_eq!(index.peek_lru(), Some("b"));
    }

    #[test]
    fn test_repeated_touch_keeps_single_slot() {
        let mut index = RecencyIndex::new();
        index.touch("a");
        index.touch("a");
        index.touch("a");

        assert_eq!(index.len(), 1);
        assert_eq!(index.pop_lru(), Some("a".to_string()));
        assert!(index.is_empty());
    }
}
