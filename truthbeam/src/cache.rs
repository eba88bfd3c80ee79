//! Bounded TTL cache for compliance metadata

use std::time::Duration;

use beacon_common::Compliance;
use moka::sync::Cache;
use thiserror::Error;

/// Default cache TTL for compliance metadata. Compliance mappings change
/// infrequently; a long TTL balances cache efficiency with eventual
/// consistency.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default cache capacity in number of entries.
pub const DEFAULT_CACHE_CAPACITY: u64 = 100_000;

/// Separator joining engine name and rule id into a composite cache key.
pub const CACHE_KEY_SEPARATOR: &str = ":";

/// Cache write/delete failure.
#[derive(Debug, Error)]
#[error("cache error: {0}")]
pub struct CacheError(pub String);

/// A concurrent store for compliance lookups.
///
/// Implementations provide their own concurrency control; callers never
/// take external locks.
pub trait ComplianceCache: Send + Sync {
    /// Retrieve a value by key.
    fn get(&self, key: &str) -> Option<Compliance>;
    /// Store a value under a key.
    fn set(&self, key: &str, value: Compliance) -> Result<(), CacheError>;
    /// Remove a value by key.
    fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Moka-backed cache with capacity bound and TTL-from-write expiry.
pub struct MokaStore {
    cache: Cache<String, Compliance>,
}

impl MokaStore {
    /// Create a store with the given TTL and capacity.
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Number of live entries (approximate).
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.cache.entry_count() == 0
    }
}

impl ComplianceCache for MokaStore {
    fn get(&self, key: &str) -> Option<Compliance> {
        self.cache.get(key)
    }

    fn set(&self, key: &str, value: Compliance) -> Result<(), CacheError> {
        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.cache.invalidate(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let store = MokaStore::new(DEFAULT_CACHE_TTL, 100);
        let compliance = Compliance::unmapped();

        store.set("engine:rule", compliance.clone()).unwrap();
        assert_eq!(store.get("engine:rule"), Some(compliance));
        assert_eq!(store.get("engine:other"), None);
    }

    #[test]
    fn test_delete() {
        let store = MokaStore::new(DEFAULT_CACHE_TTL, 100);
        store.set("k", Compliance::unmapped()).unwrap();
        store.delete("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_ttl_expiry() {
        let store = MokaStore::new(Duration::from_millis(20), 100);
        store.set("k", Compliance::unmapped()).unwrap();
        assert!(store.get("k").is_some());

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(store.get("k"), None);
    }
}
