//! Error types for the grading cache
//!
//! Provides unified error handling using thiserror.
//!
//! A cache miss is never an error; it is normal control flow expressed as
//! `Option::None`. The enums below cover the faults that can actually
//! occur: durable-store failures, record encoding, and remote lookups.

use thiserror::Error;

// == Storage Error Enum ==
/// Faults raised by the durable store tiers.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend rejected or failed the operation
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Store reached its platform-imposed capacity
    #[error("store full: {0}")]
    Full(String),
}

// == Save Error Enum ==
/// Failures surfaced to callers of the save pipeline.
///
/// Only fast-path persistence and explicit force-save failures reach
/// callers; the bulk tier fails silently.
#[derive(Error, Debug)]
pub enum SaveError {
    /// Record could not be encoded for storage
    #[error("failed to encode record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The fast-path store rejected the write
    #[error("fast-path store rejected write: {0}")]
    Store(#[from] StorageError),
}

// == Directory Error Enum ==
/// Failures from the remote student directory.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The directory request failed
    #[error("directory request failed: {0}")]
    Request(String),
}

// == Result Type Alias ==
/// Convenience Result type for save-pipeline operations.
pub type SaveResult<T> = std::result::Result<T, SaveError>;
