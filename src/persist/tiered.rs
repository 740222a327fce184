//! Tiered Persistence Module
//!
//! Fallback chain for saving grading data: synchronous fast-path write,
//! detached bulk write, read-through cache update.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::TtlStore;
use crate::error::{SaveError, SaveResult};
use crate::models::OwnerContext;
use crate::persist::{BulkStore, FastStore, StoredRecord};
use crate::tasks::Sweepable;

// == Read Cache Policy ==
/// Entries the read-through cache holds before batch eviction
const READ_CACHE_CAPACITY: usize = 256;
const READ_CACHE_EVICTION_BATCH: usize = 32;

// == Tiered Persistence ==
/// Writes records through the fast-path and bulk tiers and serves reads
/// from a short-TTL cache in front of them.
///
/// The two durable tiers are independent, non-atomic writes; a crash
/// between them can leave them divergent. The fast-path store is
/// authoritative for recovery, the bulk store a secondary redundancy.
pub struct TieredPersistence {
    fast: Arc<dyn FastStore>,
    bulk: Arc<dyn BulkStore>,
    read_cache: Arc<RwLock<TtlStore<StoredRecord>>>,
    read_ttl: Duration,
}

impl TieredPersistence {
    // == Constructor ==
    /// Creates the tier chain.
    ///
    /// # Arguments
    /// * `fast` - Synchronous fast-path store (authoritative)
    /// * `bulk` - Asynchronous bulk store (redundancy)
    /// * `read_ttl` - TTL of read-through cache entries
    pub fn new(fast: Arc<dyn FastStore>, bulk: Arc<dyn BulkStore>, read_ttl: Duration) -> Self {
        Self {
            fast,
            bulk,
            read_cache: Arc::new(RwLock::new(TtlStore::new(
                READ_CACHE_CAPACITY,
                READ_CACHE_EVICTION_BATCH,
                read_ttl,
            ))),
            read_ttl,
        }
    }

    // == Persist ==
    /// Writes a record through the tier chain.
    ///
    /// The fast-path write is authoritative: its failure is returned to
    /// the caller. The bulk write is a detached task whose result is
    /// dropped except for logging. The read-through cache is refreshed
    /// regardless of the fast-path outcome, since the in-memory value is
    /// the freshest truth for subsequent loads on this device.
    pub async fn persist(&self, key: &str, record: &StoredRecord) -> SaveResult<()> {
        let encoded = serde_json::to_string(record)?;

        let fast_result = self.fast.put(key, &encoded);
        if let Err(err) = &fast_result {
            warn!("Fast-path write for '{}' failed: {}", key, err);
        }

        // Fire-and-forget redundancy write; no join point
        let bulk = Arc::clone(&self.bulk);
        let bulk_key = key.to_string();
        tokio::spawn(async move {
            if let Err(err) = bulk.put(&bulk_key, &encoded).await {
                debug!("Bulk write for '{}' failed: {}", bulk_key, err);
            }
        });

        self.read_cache
            .write()
            .await
            .set(key.to_string(), record.clone(), Some(self.read_ttl));

        fast_result.map_err(SaveError::from)
    }

    // == Load ==
    /// Reads a record back, validating ownership.
    ///
    /// Consults the read-through cache first, then the fast-path store.
    /// Records owned by a different session, unreadable stored values, and
    /// store faults are all treated as misses, never errors.
    pub async fn load(&self, key: &str, owner: &OwnerContext) -> Option<StoredRecord> {
        if let Some(record) = self.read_cache.write().await.get(key) {
            if record.matches(owner) {
                return Some(record);
            }
            debug!("Cached record for '{}' belongs to another session", key);
            return None;
        }

        let raw = match self.fast.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("Fast-path read for '{}' failed: {}", key, err);
                return None;
            }
        };

        let record: StoredRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(err) => {
                warn!("Discarding unreadable record for '{}': {}", key, err);
                return None;
            }
        };

        if !record.matches(owner) {
            debug!("Stored record for '{}' belongs to another session", key);
            return None;
        }

        self.read_cache
            .write()
            .await
            .set(key.to_string(), record.clone(), Some(self.read_ttl));
        Some(record)
    }

    // == Discard ==
    /// Best-effort removal from the fast store and the read cache.
    pub async fn discard(&self, key: &str) {
        if let Err(err) = self.fast.remove(key) {
            warn!("Fast-path remove for '{}' failed: {}", key, err);
        }
        self.read_cache.write().await.delete(key);
    }

    // == Read Cache Length ==
    /// Number of entries currently in the read-through cache.
    pub async fn read_cache_len(&self) -> usize {
        self.read_cache.read().await.len()
    }
}

#[async_trait]
impl Sweepable for TieredPersistence {
    async fn sweep_expired(&self) -> usize {
        self.read_cache.write().await.sweep_expired()
    }

    fn name(&self) -> &'static str {
        "read-through-cache"
    }
}
