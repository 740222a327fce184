//! Persistence Module
//!
//! Tiered durable storage for in-progress grading data: a synchronous
//! fast-path store, a best-effort asynchronous bulk store, and a
//! read-through cache layered in front of both.

mod memory;
mod tiered;

pub use memory::{MemoryBulkStore, MemoryFastStore};
pub use tiered::TieredPersistence;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::models::OwnerContext;

// == Fast-Path Store ==
/// Synchronous, low-capacity durable store.
///
/// This is the authoritative tier: its write failures are the only
/// storage faults surfaced to the save pipeline's callers.
pub trait FastStore: Send + Sync {
    /// Stores a serialized record under `key`.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Retrieves a serialized record by `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Removes a record by `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// == Bulk Store ==
/// Asynchronous, high-capacity durable store.
///
/// A redundancy tier only: writes are detached and its failures never
/// surface past a log line.
#[async_trait]
pub trait BulkStore: Send + Sync {
    /// Stores a serialized record under `key`.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Retrieves a serialized record by `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
}

// == Stored Record ==
/// Durable envelope around a working payload, stamped with its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Teacher/session identifier the record belongs to
    pub owner_id: String,
    /// Logical resource the record belongs to
    pub resource: String,
    /// The persisted working value
    pub payload: Value,
    /// When the record was written
    pub saved_at: DateTime<Utc>,
}

impl StoredRecord {
    // == Constructor ==
    /// Creates a record owned by `owner` carrying `payload`.
    pub fn new(owner: &OwnerContext, payload: Value) -> Self {
        Self {
            owner_id: owner.owner_id.clone(),
            resource: owner.resource.clone(),
            payload,
            saved_at: Utc::now(),
        }
    }

    // == Matches Owner ==
    /// A record belongs to a session only when both identifiers match.
    pub fn matches(&self, owner: &OwnerContext) -> bool {
        self.owner_id == owner.owner_id && self.resource == owner.resource
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_matches_its_owner() {
        let owner = OwnerContext::new("T001", "grading-form");
        let record = StoredRecord::new(&owner, json!({"q1": 12}));

        assert!(record.matches(&owner));
    }

    #[test]
    fn test_record_rejects_other_owner() {
        let owner = OwnerContext::new("T001", "grading-form");
        let record = StoredRecord::new(&owner, json!({"q1": 12}));

        assert!(!record.matches(&OwnerContext::new("T002", "grading-form")));
        assert!(!record.matches(&OwnerContext::new("T001", "other-form")));
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let owner = OwnerContext::new("T001", "grading-form");
        let record = StoredRecord::new(&owner, json!({"q1": 12, "q2": 7.5}));

        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: StoredRecord = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, record);
    }
}
