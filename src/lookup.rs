//! Student Lookup Module
//!
//! Normalized caches for single-student lookups and search results, with
//! a read-through path to the remote directory.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, TtlStore};
use crate::config::Config;
use crate::error::DirectoryError;
use crate::models::Student;
use crate::tasks::Sweepable;

// == Cache Policy Constants ==
/// Entries the student cache holds before batch eviction
pub const STUDENT_CACHE_CAPACITY: usize = 200;
pub const STUDENT_CACHE_EVICTION_BATCH: usize = 50;
/// Default student entry lifetime (30 minutes)
pub const STUDENT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Entries the search-result cache holds before batch eviction
pub const SEARCH_CACHE_CAPACITY: usize = 100;
pub const SEARCH_CACHE_EVICTION_BATCH: usize = 20;
/// Default search-result lifetime (15 minutes)
pub const SEARCH_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

// == Key Normalization ==
/// Normalizes a lookup code or search term: trimmed, lowercased.
///
/// Two differently-cased inputs must hit the same entry.
fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// == Student Directory ==
/// Remote entity service consulted on cache miss.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// Fetches a student by lookup code, `None` when unknown.
    async fn fetch_by_code(&self, code: &str) -> Result<Option<Student>, DirectoryError>;
}

// == Student Cache ==
/// Single-student lookup cache keyed by normalized lookup code.
///
/// Cloning is cheap; clones share the same underlying store.
#[derive(Clone)]
pub struct StudentCache {
    store: Arc<RwLock<TtlStore<Student>>>,
}

impl StudentCache {
    // == Constructor ==
    /// Creates a cache with the default policy (capacity 200, batch 50,
    /// TTL 30 minutes).
    pub fn new() -> Self {
        Self::with_policy(
            STUDENT_CACHE_CAPACITY,
            STUDENT_CACHE_EVICTION_BATCH,
            STUDENT_CACHE_TTL,
        )
    }

    /// Creates a cache with an explicit policy.
    pub fn with_policy(capacity: usize, eviction_batch: usize, default_ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(TtlStore::new(
                capacity,
                eviction_batch,
                default_ttl,
            ))),
        }
    }

    /// Creates a cache sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_policy(
            config.student_cache_capacity,
            STUDENT_CACHE_EVICTION_BATCH,
            Duration::from_secs(config.student_cache_ttl),
        )
    }

    // == Get By Code ==
    /// Returns the cached student for a lookup code, if live.
    pub async fn get_by_code(&self, code: &str) -> Option<Student> {
        self.store.write().await.get(&normalize(code))
    }

    // == Set By Code ==
    /// Caches a student under its normalized lookup code.
    ///
    /// # Arguments
    /// * `code` - Raw lookup code (normalized internally)
    /// * `student` - The student to cache
    /// * `ttl` - Optional TTL (uses the default when None)
    pub async fn set_by_code(&self, code: &str, student: Student, ttl: Option<Duration>) {
        self.store.write().await.set(normalize(code), student, ttl);
    }

    // == Lookup ==
    /// Read-through lookup: cache hit or directory fetch.
    ///
    /// A student the directory does not know is a plain miss and is not
    /// cached. Directory failures propagate to the caller.
    pub async fn lookup(
        &self,
        code: &str,
        directory: &dyn StudentDirectory,
    ) -> Result<Option<Student>, DirectoryError> {
        if let Some(student) = self.get_by_code(code).await {
            return Ok(Some(student));
        }

        let trimmed = code.trim();
        debug!("Student '{}' not cached, consulting directory", trimmed);
        match directory.fetch_by_code(trimmed).await? {
            Some(student) => {
                self.set_by_code(code, student.clone(), None).await;
                Ok(Some(student))
            }
            None => Ok(None),
        }
    }

    // == Clear ==
    /// Drops every cached student.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}

impl Default for StudentCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sweepable for StudentCache {
    async fn sweep_expired(&self) -> usize {
        self.store.write().await.sweep_expired()
    }

    fn name(&self) -> &'static str {
        "student-cache"
    }
}

// == Search Cache ==
/// Search-result cache keyed by normalized search term; values are the
/// ordered matches the term produced.
#[derive(Clone)]
pub struct SearchCache {
    store: Arc<RwLock<TtlStore<Vec<Student>>>>,
}

impl SearchCache {
    // == Constructor ==
    /// Creates a cache with the default policy (capacity 100, batch 20,
    /// TTL 15 minutes).
    pub fn new() -> Self {
        Self::with_policy(
            SEARCH_CACHE_CAPACITY,
            SEARCH_CACHE_EVICTION_BATCH,
            SEARCH_CACHE_TTL,
        )
    }

    /// Creates a cache with an explicit policy.
    pub fn with_policy(capacity: usize, eviction_batch: usize, default_ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(TtlStore::new(
                capacity,
                eviction_batch,
                default_ttl,
            ))),
        }
    }

    /// Creates a cache sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_policy(
            config.search_cache_capacity,
            SEARCH_CACHE_EVICTION_BATCH,
            Duration::from_secs(config.search_cache_ttl),
        )
    }

    // == Get Results ==
    /// Returns the cached matches for a search term, if live.
    pub async fn get_results(&self, term: &str) -> Option<Vec<Student>> {
        self.store.write().await.get(&normalize(term))
    }

    // == Set Results ==
    /// Caches the matches a search term produced.
    pub async fn set_results(&self, term: &str, students: Vec<Student>, ttl: Option<Duration>) {
        self.store.write().await.set(normalize(term), students, ttl);
    }

    // == Clear ==
    /// Drops every cached search result.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sweepable for SearchCache {
    async fn sweep_expired(&self) -> usize {
        self.store.write().await.sweep_expired()
    }

    fn name(&self) -> &'static str {
        "search-cache"
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_student(code: &str) -> Student {
        Student {
            code: code.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            class_name: "6A".to_string(),
        }
    }

    /// Directory stub that counts fetches and knows a fixed set of codes.
    struct CountingDirectory {
        known: Vec<Student>,
        calls: AtomicUsize,
    }

    impl CountingDirectory {
        fn with_students(known: Vec<Student>) -> Self {
            Self {
                known,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StudentDirectory for CountingDirectory {
        async fn fetch_by_code(&self, code: &str) -> Result<Option<Student>, DirectoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .known
                .iter()
                .find(|s| s.code.eq_ignore_ascii_case(code))
                .cloned())
        }
    }

    struct FailingDirectory;

    #[async_trait]
    impl StudentDirectory for FailingDirectory {
        async fn fetch_by_code(&self, _code: &str) -> Result<Option<Student>, DirectoryError> {
            Err(DirectoryError::Request("connection refused".to_string()))
        }
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  AB12 "), "ab12");
        assert_eq!(normalize("ab12"), "ab12");
    }

    #[tokio::test]
    async fn test_student_cache_normalization_idempotence() {
        let cache = StudentCache::new();

        cache.set_by_code("AB12", test_student("AB12"), None).await;

        // Different case and whitespace hit the same entry
        let hit = cache.get_by_code("ab12 ").await;
        assert!(hit.is_some());
        assert_eq!(hit.unwrap().code, "AB12");
    }

    #[tokio::test]
    async fn test_student_cache_miss() {
        let cache = StudentCache::new();

        assert!(cache.get_by_code("zz99").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_fetches_once() {
        let cache = StudentCache::new();
        let directory = CountingDirectory::with_students(vec![test_student("AB12")]);

        let first = cache.lookup("AB12", &directory).await.unwrap();
        let second = cache.lookup("ab12", &directory).await.unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(directory.call_count(), 1, "Second lookup should hit the cache");
    }

    #[tokio::test]
    async fn test_lookup_unknown_student_not_cached() {
        let cache = StudentCache::new();
        let directory = CountingDirectory::with_students(vec![]);

        assert!(cache.lookup("zz99", &directory).await.unwrap().is_none());
        assert!(cache.lookup("zz99", &directory).await.unwrap().is_none());

        // Not-found is a plain miss; both lookups consult the directory
        assert_eq!(directory.call_count(), 2);
    }

    #[tokio::test]
    async fn test_lookup_propagates_directory_errors() {
        let cache = StudentCache::new();

        let result = cache.lookup("ab12", &FailingDirectory).await;
        assert!(matches!(result, Err(DirectoryError::Request(_))));
    }

    #[tokio::test]
    async fn test_student_cache_clear() {
        let cache = StudentCache::new();

        cache.set_by_code("ab12", test_student("ab12"), None).await;
        cache.clear().await;

        assert!(cache.get_by_code("ab12").await.is_none());
        assert_eq!(cache.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_search_cache_roundtrip() {
        let cache = SearchCache::new();
        let matches = vec![test_student("ab12"), test_student("ab13")];

        cache.set_results("Love", matches.clone(), None).await;

        assert_eq!(cache.get_results("  love").await, Some(matches));
    }

    #[tokio::test]
    async fn test_search_cache_preserves_order() {
        let cache = SearchCache::new();
        let matches = vec![test_student("b2"), test_student("a1"), test_student("c3")];

        cache.set_results("class 6a", matches.clone(), None).await;

        let cached = cache.get_results("class 6a").await.unwrap();
        let codes: Vec<&str> = cached.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["b2", "a1", "c3"]);
    }

    #[tokio::test]
    async fn test_search_cache_clear() {
        let cache = SearchCache::new();

        cache.set_results("love", vec![test_student("ab12")], None).await;
        cache.clear().await;

        assert!(cache.get_results("love").await.is_none());
    }

    #[tokio::test]
    async fn test_from_config_policies() {
        let config = Config::default();

        let students = StudentCache::from_config(&config);
        let searches = SearchCache::from_config(&config);

        students.set_by_code("ab12", test_student("ab12"), None).await;
        searches.set_results("love", vec![test_student("ab12")], None).await;

        assert!(students.get_by_code("ab12").await.is_some());
        assert!(searches.get_results("love").await.is_some());
    }
}
