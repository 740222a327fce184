//! In-Memory Store Backends
//!
//! Reference implementations of the two durable tiers, used by tests and
//! as local defaults.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::persist::{BulkStore, FastStore};

// == Memory Fast Store ==
/// Bounded synchronous store mirroring the fast-path tier's
/// platform-imposed capacity.
pub struct MemoryFastStore {
    data: Mutex<HashMap<String, String>>,
    /// Maximum number of keys the store accepts
    capacity: usize,
}

impl MemoryFastStore {
    // == Constructor ==
    /// Creates a store that accepts at most `capacity` distinct keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Current number of stored keys.
    pub fn len(&self) -> usize {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every stored key.
    pub fn clear(&self) {
        self.data.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl FastStore for MemoryFastStore {
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        if !data.contains_key(key) && data.len() >= self.capacity {
            return Err(StorageError::Full(format!(
                "fast store holds {} of {} keys",
                data.len(),
                self.capacity
            )));
        }
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        Ok(data.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        data.remove(key);
        Ok(())
    }
}

// == Memory Bulk Store ==
/// Unbounded asynchronous store with an optional artificial latency, used
/// to exercise the fire-and-forget guarantee in tests.
pub struct MemoryBulkStore {
    data: tokio::sync::Mutex<HashMap<String, String>>,
    latency: Option<Duration>,
}

impl MemoryBulkStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            data: tokio::sync::Mutex::new(HashMap::new()),
            latency: None,
        }
    }

    /// Creates a store that sleeps for `latency` before every operation.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            data: tokio::sync::Mutex::new(HashMap::new()),
            latency: Some(latency),
        }
    }

    /// Current number of stored keys.
    pub async fn len(&self) -> usize {
        self.data.lock().await.len()
    }

    /// Check if empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryBulkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BulkStore for MemoryBulkStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut data = self.data.lock().await;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let data = self.data.lock().await;
        Ok(data.get(key).cloned())
    }
}
