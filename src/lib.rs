//! Gradebook Cache - client-side grading cache and auto-save pipeline
//!
//! Provides TTL caching with batched creation-order eviction, normalized
//! student lookup caches, a priority-ordered write-coalescing save queue,
//! and a tiered persistence fallback for in-progress grading data.

pub mod cache;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod persist;
pub mod save;
pub mod service;
pub mod tasks;

pub use config::Config;
pub use error::{DirectoryError, SaveError, StorageError};
pub use lookup::{SearchCache, StudentCache, StudentDirectory};
pub use models::{OwnerContext, Student};
pub use persist::{
    BulkStore, FastStore, MemoryBulkStore, MemoryFastStore, StoredRecord, TieredPersistence,
};
pub use save::{AutoSaveQueue, SavePriority, SaveStatus};
pub use service::GradeCacheService;
pub use tasks::{spawn_sweep_task, Sweepable};
