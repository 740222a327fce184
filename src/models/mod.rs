//! Domain Models Module
//!
//! Records shared across the cache, lookup, and persistence layers.

use serde::{Deserialize, Serialize};

// == Student ==
/// A student as returned by the remote directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Lookup code printed on the exam sheet
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    /// Class the student is enrolled in
    pub class_name: String,
}

// == Owner Context ==
/// Identifies the session a persisted record belongs to.
///
/// A stored record is only handed back to a caller whose owner context
/// matches on both fields, so stale data from another session cannot leak
/// into a new one that reuses the same storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerContext {
    /// Teacher/session identifier
    pub owner_id: String,
    /// Logical resource the record belongs to (e.g. a grading form)
    pub resource: String,
}

impl OwnerContext {
    // == Constructor ==
    pub fn new(owner_id: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            resource: resource.into(),
        }
    }

    // == Scoped Key ==
    /// Composite storage key carrying the owner scope, so invalidation can
    /// match on the owner identifier as a substring.
    pub fn scoped_key(&self) -> String {
        format!("{}:{}", self.owner_id, self.resource)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_key_format() {
        let owner = OwnerContext::new("T001", "grading-form");
        assert_eq!(owner.scoped_key(), "T001:grading-form");
    }

    #[test]
    fn test_scoped_key_contains_owner() {
        let owner = OwnerContext::new("T001", "grading-form");
        assert!(owner.scoped_key().contains("T001"));
    }

    #[test]
    fn test_student_serde_roundtrip() {
        let student = Student {
            code: "AB12".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            class_name: "6A".to_string(),
        };

        let encoded = serde_json::to_string(&student).unwrap();
        let decoded: Student = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, student);
    }
}
