//! Creation Order Module
//!
//! Tracks insertion order of keys for batched oldest-first eviction.

use std::collections::VecDeque;

// == Creation Order Tracker ==
/// Tracks keys by creation time for eviction tie-breaking.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest created
/// - Back = Newest created
///
/// Unlike an LRU tracker, reads never reorder keys; only inserting or
/// overwriting an entry re-stamps it.
#[derive(Debug, Default)]
pub struct CreationOrder {
    /// Keys ordered by creation time
    order: VecDeque<String>,
}

impl CreationOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Stamps a key as newly created (moves to back).
    ///
    /// If the key exists, removes it first then adds to back, so an
    /// overwrite counts as a fresh creation.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest Batch ==
    /// Removes and returns up to `count` of the oldest keys.
    ///
    /// Returns fewer keys when the tracker holds fewer than `count`.
    pub fn evict_oldest(&mut self, count: usize) -> Vec<String> {
        let take = count.min(self.order.len());
        self.order.drain(..take).collect()
    }

    // == Peek Oldest ==
    /// Returns the oldest key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    // == Clear ==
    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_new() {
        let order = CreationOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.len(), 0);
    }

    #[test]
    fn test_record_new_keys() {
        let mut order = CreationOrder::new();

        order.record("key1");
        order.record("key2");
        order.record("key3");

        assert_eq!(order.len(), 3);
        // key1 is oldest (recorded first)
        assert_eq!(order.peek_oldest(), Some(&"key1".to_string()));
    }

    #[test]
    fn test_record_existing_key_restamps() {
        let mut order = CreationOrder::new();

        order.record("key1");
        order.record("key2");
        order.record("key3");

        // Overwriting key1 re-stamps it as newest
        order.record("key1");

        assert_eq!(order.len(), 3);
        assert_eq!(order.peek_oldest(), Some(&"key2".to_string()));
    }

    #[test]
    fn test_evict_oldest_batch() {
        let mut order = CreationOrder::new();

        order.record("key1");
        order.record("key2");
        order.record("key3");
        order.record("key4");

        let evicted = order.evict_oldest(2);
        assert_eq!(evicted, vec!["key1".to_string(), "key2".to_string()]);
        assert_eq!(order.len(), 2);
        assert_eq!(order.peek_oldest(), Some(&"key3".to_string()));
    }

    #[test]
    fn test_evict_more_than_tracked() {
        let mut order = CreationOrder::new();

        order.record("key1");
        order.record("key2");

        let evicted = order.evict_oldest(10);
        assert_eq!(evicted.len(), 2);
        assert!(order.is_empty());
    }

    #[test]
    fn test_evict_empty() {
        let mut order = CreationOrder::new();
        assert!(order.evict_oldest(5).is_empty());
    }

    #[test]
    fn test_remove() {
        let mut order = CreationOrder::new();

        order.record("key1");
        order.record("key2");
        order.record("key3");

        order.remove("key2");

        assert_eq!(order.len(), 2);
        assert!(!order.contains("key2"));
        assert!(order.contains("key1"));
        assert!(order.contains("key3"));
    }

    #[test]
    fn test_remove_nonexistent_key() {
        let mut order = CreationOrder::new();

        order.record("key1");

        // Should not panic or affect existing keys
        order.remove("nonexistent");

        assert_eq!(order.len(), 1);
        assert!(order.contains("key1"));
    }

    #[test]
    fn test_clear() {
        let mut order = CreationOrder::new();

        order.record("key1");
        order.record("key2");

        order.clear();

        assert!(order.is_empty());
    }

    #[test]
    fn test_eviction_order_after_restamp() {
        let mut order = CreationOrder::new();

        // Record keys: a, b, c
        order.record("a");
        order.record("b");
        order.record("c");

        // Overwrite 'a' - it becomes the newest
        order.record("a");

        // Eviction order is now: b, c, a
        assert_eq!(order.evict_oldest(1), vec!["b".to_string()]);
        assert_eq!(order.evict_oldest(1), vec!["c".to_string()]);
        assert_eq!(order.evict_oldest(1), vec!["a".to_string()]);
    }
}
