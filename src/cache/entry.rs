//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that stays live for `ttl`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - How long the entry is considered live
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = current_timestamp_ms();
        // Expiry must land strictly after creation, even for a zero TTL.
        let ttl_ms = (ttl.as_millis() as u64).max(1);

        Self {
            value,
            created_at: now,
            expires_at: now + ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is live while the current time is at or
    /// before its expiration time, and expired once the current time moves
    /// strictly past it.
    ///
    /// # Returns
    /// - `true` if the current time > expiration time
    /// - `false` while the entry is still live
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() > self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or 0 once expired.
    ///
    /// This method is useful for debugging and statistics purposes.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
