//! Grade Cache Service Module
//!
//! Process-wide TTL cache surface with fixed key-naming helpers for
//! grading views. Constructed once per application runtime and injected
//! into consumers; `clear`/`clear_expired` support explicit teardown and
//! reset between test runs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::cache::{CacheStats, TtlStore};
use crate::config::Config;
use crate::tasks::Sweepable;

// == Cache Policy Constants ==
/// Entries the grade cache holds before batch eviction
pub const GRADE_CACHE_CAPACITY: usize = 500;
pub const GRADE_CACHE_EVICTION_BATCH: usize = 50;
/// Default entry lifetime (10 minutes)
pub const GRADE_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

// == Key Naming ==
fn active_exam_key(owner_id: &str) -> String {
    format!("{}:active-exam", owner_id)
}

fn batch_grades_key(owner_id: &str, exam_id: &str) -> String {
    format!("{}:grades:{}", owner_id, exam_id)
}

// == Grade Cache Service ==
/// Generic cache surface over a `TtlStore<Value>`, plus named helpers
/// with fixed key-naming conventions.
///
/// Cloning is cheap; clones share the same underlying store.
#[derive(Clone)]
pub struct GradeCacheService {
    store: Arc<RwLock<TtlStore<Value>>>,
}

impl GradeCacheService {
    // == Constructor ==
    /// Creates a service with the default policy (capacity 500, batch 50,
    /// TTL 10 minutes).
    pub fn new() -> Self {
        Self::with_policy(
            GRADE_CACHE_CAPACITY,
            GRADE_CACHE_EVICTION_BATCH,
            GRADE_CACHE_TTL,
        )
    }

    /// Creates a service with an explicit policy.
    pub fn with_policy(capacity: usize, eviction_batch: usize, default_ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(TtlStore::new(
                capacity,
                eviction_batch,
                default_ttl,
            ))),
        }
    }

    /// Creates a service sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_policy(
            config.grade_cache_capacity,
            GRADE_CACHE_EVICTION_BATCH,
            Duration::from_secs(config.grade_cache_ttl),
        )
    }

    // == Generic Surface ==
    /// Stores a value with optional TTL.
    pub async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        self.store.write().await.set(key.to_string(), value, ttl);
    }

    /// Retrieves a live value by key.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.store.write().await.get(key)
    }

    /// Checks whether a live entry exists for `key`.
    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    /// Removes an entry by key.
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Removes expired entries, returning how many were dropped.
    pub async fn clear_expired(&self) -> usize {
        self.store.write().await.sweep_expired()
    }

    /// Current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Named Helpers ==
    /// Caches the exam a teacher currently has open.
    pub async fn cache_active_exam_id(&self, owner_id: &str, exam_id: &str) {
        self.set(
            &active_exam_key(owner_id),
            Value::String(exam_id.to_string()),
            None,
        )
        .await;
    }

    /// Returns the cached active exam id for a teacher.
    pub async fn active_exam_id(&self, owner_id: &str) -> Option<String> {
        self.get(&active_exam_key(owner_id))
            .await
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Caches a batch grade view for one exam.
    pub async fn cache_batch_grades(&self, owner_id: &str, exam_id: &str, grades: Value) {
        self.set(&batch_grades_key(owner_id, exam_id), grades, None)
            .await;
    }

    /// Returns the cached batch grade view for one exam.
    pub async fn batch_grades(&self, owner_id: &str, exam_id: &str) -> Option<Value> {
        self.get(&batch_grades_key(owner_id, exam_id)).await
    }

    // == Invalidate Scope ==
    /// Drops every entry whose key carries the owner identifier.
    ///
    /// Used when a teacher's grades land server-side and all locally
    /// cached derived views must be treated as stale.
    pub async fn invalidate_scope(&self, owner_id: &str) -> usize {
        let removed = self.store.write().await.invalidate_matching(owner_id);
        if removed > 0 {
            info!("Invalidated {} cached entries for '{}'", removed, owner_id);
        }
        removed
    }
}

impl Default for GradeCacheService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sweepable for GradeCacheService {
    async fn sweep_expired(&self) -> usize {
        self.store.write().await.sweep_expired()
    }

    fn name(&self) -> &'static str {
        "grade-cache"
    }
}
