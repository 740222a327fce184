//! Configuration Module
//!
//! Handles loading cache policy from environment variables.

use std::env;

/// Cache policy configuration.
///
/// All values can be configured via environment variables with sensible
/// defaults. TTLs and intervals are in seconds.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum entries in the student lookup cache
    pub student_cache_capacity: usize,
    /// Student entry TTL in seconds
    pub student_cache_ttl: u64,
    /// Maximum entries in the search-result cache
    pub search_cache_capacity: usize,
    /// Search-result TTL in seconds
    pub search_cache_ttl: u64,
    /// Maximum entries in the grade cache service
    pub grade_cache_capacity: usize,
    /// Grade cache entry TTL in seconds
    pub grade_cache_ttl: u64,
    /// Read-through cache TTL in seconds
    pub read_cache_ttl: u64,
    /// Background expiry sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STUDENT_CACHE_CAPACITY` - Student cache entries (default: 200)
    /// - `STUDENT_CACHE_TTL` - Student entry TTL in seconds (default: 1800)
    /// - `SEARCH_CACHE_CAPACITY` - Search cache entries (default: 100)
    /// - `SEARCH_CACHE_TTL` - Search-result TTL in seconds (default: 900)
    /// - `GRADE_CACHE_CAPACITY` - Grade cache entries (default: 500)
    /// - `GRADE_CACHE_TTL` - Grade entry TTL in seconds (default: 600)
    /// - `READ_CACHE_TTL` - Read-through TTL in seconds (default: 60)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    pub fn from_env() -> Self {
        Self {
            student_cache_capacity: env::var("STUDENT_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            student_cache_ttl: env::var("STUDENT_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
            search_cache_capacity: env::var("SEARCH_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            search_cache_ttl: env::var("SEARCH_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900),
            grade_cache_capacity: env::var("GRADE_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            grade_cache_ttl: env::var("GRADE_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            read_cache_ttl: env::var("READ_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            student_cache_capacity: 200,
            student_cache_ttl: 1800,
            search_cache_capacity: 100,
            search_cache_ttl: 900,
            grade_cache_capacity: 500,
            grade_cache_ttl: 600,
            read_cache_ttl: 60,
            sweep_interval: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.student_cache_capacity, 200);
        assert_eq!(config.student_cache_ttl, 1800);
        assert_eq!(config.search_cache_capacity, 100);
        assert_eq!(config.search_cache_ttl, 900);
        assert_eq!(config.grade_cache_capacity, 500);
        assert_eq!(config.grade_cache_ttl, 600);
        assert_eq!(config.read_cache_ttl, 60);
        assert_eq!(config.sweep_interval, 300);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("STUDENT_CACHE_CAPACITY");
        env::remove_var("STUDENT_CACHE_TTL");
        env::remove_var("SEARCH_CACHE_CAPACITY");
        env::remove_var("SEARCH_CACHE_TTL");
        env::remove_var("GRADE_CACHE_CAPACITY");
        env::remove_var("GRADE_CACHE_TTL");
        env::remove_var("READ_CACHE_TTL");
        env::remove_var("SWEEP_INTERVAL");

        let config = Config::from_env();
        assert_eq!(config.student_cache_capacity, 200);
        assert_eq!(config.search_cache_capacity, 100);
        assert_eq!(config.grade_cache_capacity, 500);
        assert_eq!(config.sweep_interval, 300);
    }
}
