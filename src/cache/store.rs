//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with creation-order
//! tracking, TTL expiration, and batched capacity eviction.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, CreationOrder};

// == TTL Store ==
/// Generic key-value store with per-entry expiry and batched eviction.
///
/// When an insert pushes the size above `capacity`, the oldest
/// `eviction_batch` entries by creation time are removed in one batch,
/// amortizing cleanup cost versus evicting one at a time.
#[derive(Debug)]
pub struct TtlStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Creation-order tracker for eviction tie-breaking
    order: CreationOrder,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// How many of the oldest entries one eviction removes
    eviction_batch: usize,
    /// Default TTL for entries without an explicit one
    default_ttl: Duration,
}

impl<V: Clone> TtlStore<V> {
    // == Constructor ==
    /// Creates a new TtlStore with the given capacity policy.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the store can hold
    /// * `eviction_batch` - Oldest entries removed per capacity overflow
    /// * `default_ttl` - TTL applied when `set` receives `None`
    pub fn new(capacity: usize, eviction_batch: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: CreationOrder::new(),
            stats: CacheStats::new(),
            capacity,
            eviction_batch,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL. Always succeeds.
    ///
    /// If the key already exists, the value is overwritten, the TTL reset,
    /// and the entry re-stamped as newest. If the insert pushes the store
    /// over capacity, the oldest batch is evicted.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses the default when None)
    pub fn set(&mut self, key: String, value: V, ttl: Option<Duration>) {
        let effective_ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, effective_ttl);

        self.order.record(&key);
        self.entries.insert(key, entry);

        if self.entries.len() > self.capacity {
            self.evict_oldest_batch();
        }

        self.stats.set_total_entries(self.entries.len());
    }

    // == Evict Oldest Batch ==
    /// Removes the oldest `eviction_batch` entries by creation time.
    fn evict_oldest_batch(&mut self) {
        let evicted = self.order.evict_oldest(self.eviction_batch);
        for key in &evicted {
            self.entries.remove(key);
            self.stats.record_eviction();
        }
        debug!(
            "Evicted {} oldest entries, {} remain",
            evicted.len(),
            self.entries.len()
        );
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if present and not expired. An expired entry is
    /// removed during the lookup and counted as a miss (lazy expiry).
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    pub fn get(&mut self, key: &str) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                self.order.remove(key);
                self.stats.record_expiration();
                self.stats.record_miss();
                self.stats.set_total_entries(self.entries.len());
                return None;
            }

            let value = entry.value.clone();
            self.stats.record_hit();
            Some(value)
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Has ==
    /// Checks whether a live entry exists for `key`, without exposing the
    /// value. Shares `get`'s lazy-expiry side effect.
    pub fn has(&mut self, key: &str) -> bool {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                self.order.remove(key);
                self.stats.record_expiration();
                self.stats.record_miss();
                self.stats.set_total_entries(self.entries.len());
                return false;
            }
            self.stats.record_hit();
            true
        } else {
            self.stats.record_miss();
            false
        }
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// # Returns
    /// `true` if an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Drops every entry unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Intended to run on a fixed interval so memory stays bounded for
    /// entries that are written but never re-read.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.order.remove(&key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Invalidate Matching ==
    /// Removes every entry whose key contains `fragment`.
    ///
    /// Scoped invalidation works by substring matching over the key space
    /// rather than a separate owner index.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_matching(&mut self, fragment: &str) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.contains(fragment))
            .cloned()
            .collect();

        for key in &matching {
            self.entries.remove(key);
            self.order.remove(key);
        }

        self.stats.set_total_entries(self.entries.len());
        if !matching.is_empty() {
            debug!(
                "Invalidated {} entries matching '{}'",
                matching.len(),
                fragment
            );
        }
        matching.len()
    }

    // == Stats ==
    /// Returns current cache statistics. No side effects.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats.set_expired_pending(
            self.entries
                .values()
                .filter(|entry| entry.is_expired())
                .count(),
        );
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
