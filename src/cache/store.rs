//! Cache Store Module
//!
//! Generic TTL cache shared between request handlers and the sweep task.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::debug;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats, Clock, Sweep, SystemClock};

// == TTL Cache ==
/// Key/value store with per-entry expiration and lazy eviction.
///
/// One instance holds one key-space, so the value type is fixed per cache.
/// All methods take `&self`; share it behind an `Arc`. The lock only ever
/// guards map access and is never held across an `.await`.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
    /// Time source for expirations
    clock: Arc<dyn Clock>,
    /// Performance statistics
    stats: StatsCounters,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache on the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            clock,
            stats: StatsCounters::default(),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get ==
    /// Returns a clone of the live value stored under `key`.
    ///
    /// Expired entries are reported as absent but left in place for the
    /// sweep; a lookup never mutates the map.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let value = self
            .read()
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone());

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// The entry expires `ttl` from now, or `default_ttl` when `ttl` is `None`.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry::new(value, self.clock.now(), ttl.unwrap_or(self.default_ttl));
        self.write().insert(key.into(), entry);
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns whether an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        self.write().remove(key).is_some()
    }

    // == Get Or Fetch ==
    /// Returns the live value for `key`, or runs `fetch` and caches its result.
    ///
    /// `fetch` runs with no lock held. Only `Ok` values are stored; an error is
    /// returned as-is and leaves the cache untouched. Concurrent misses on the
    /// same key each call `fetch` and the last `set` wins.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        debug!(key, "cache miss, fetching");
        let value = fetch().await?;
        self.set(key, value.clone(), ttl);
        Ok(value)
    }

    // == Cleanup Expired ==
    /// Physically removes every expired entry and returns how many went.
    ///
    /// Expired keys are collected under the read lock first; the write lock
    /// is then taken only to remove keys that are still expired, so an entry
    /// refreshed in between survives.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let expired_keys: Vec<String> = self
            .read()
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        if expired_keys.is_empty() {
            return 0;
        }

        let now = self.clock.now();
        let mut entries = self.write();
        let mut removed = 0;
        for key in expired_keys {
            if entries.get(&key).is_some_and(|entry| entry.is_expired(now)) {
                entries.remove(&key);
                removed += 1;
            }
        }
        drop(entries);

        self.stats.record_swept(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    /// TTL applied when none is given to `set`.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Length ==
    /// Number of physical entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no physical entries.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl<V: Clone + Send + Sync> Sweep for TtlCache<V> {
    fn sweep_expired(&self) -> usize {
        TtlCache::sweep_expired(self)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    const TTL: Duration = Duration::from_secs(300);

    fn manual_cache() -> (Arc<ManualClock>, TtlCache<String>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock(TTL, clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_store_new() {
        let cache: TtlCache<String> = TtlCache::new(TTL);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.default_ttl(), TTL);
    }

    #[test]
    fn test_store_set_and_get() {
        let (_, cache) = manual_cache();

        cache.set("key1", "value1".to_string(), None);

        assert_eq!(cache.get("key1").as_deref(), Some("value1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_set_with_huge_ttl_never_panics() {
        let (clock, cache) = manual_cache();

        cache.set("forever", "v".to_string(), Some(Duration::from_secs(u64::MAX)));
        clock.advance(Duration::from_secs(365 * 24 * 60 * 60));

        assert_eq!(cache.get("forever").as_deref(), Some("v"));

        let unbounded = TtlCache::with_clock(Duration::MAX, clock);
        unbounded.set("k", 1u8, None);
        assert_eq!(unbounded.get("k"), Some(1));
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (_, cache) = manual_cache();
        assert!(cache.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_delete() {
        let (_, cache) = manual_cache();

        cache.set("key1", "value1".to_string(), None);
        assert!(cache.delete("key1"));

        assert!(cache.is_empty());
        assert!(cache.get("key1").is_none());
    }

    #[test]
    fn test_store_delete_nonexistent_is_noop() {
        let (_, cache) = manual_cache();
        cache.set("other", "v".to_string(), None);

        assert!(!cache.delete("nonexistent"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_overwrite() {
        let (_, cache) = manual_cache();

        cache.set("key1", "value1".to_string(), None);
        cache.set("key1", "value2".to_string(), None);

        assert_eq!(cache.get("key1").as_deref(), Some("value2"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (clock, cache) = manual_cache();

        cache.set("key1", "value1".to_string(), Some(Duration::from_secs(1)));
        assert!(cache.get("key1").is_some());

        clock.advance(Duration::from_millis(1100));

        assert!(cache.get("key1").is_none());
        // Lazy: still physically present until swept
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_default_ttl_applies() {
        let (clock, cache) = manual_cache();
        cache.set("key1", "value1".to_string(), None);

        clock.advance(TTL - Duration::from_secs(1));
        assert!(cache.get("key1").is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get("key1").is_none());
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let (clock, cache) = manual_cache();
        cache.set("key1", "old".to_string(), Some(Duration::from_secs(10)));

        clock.advance(Duration::from_secs(8));
        cache.set("key1", "new".to_string(), Some(Duration::from_secs(10)));

        clock.advance(Duration::from_secs(8));
        assert_eq!(cache.get("key1").as_deref(), Some("new"));
    }

    #[test]
    fn test_store_stats() {
        let (_, cache) = manual_cache();

        cache.set("key1", "value1".to_string(), None);
        cache.get("key1"); // hit
        cache.get("nonexistent"); // miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_sweep_expired() {
        let (clock, cache) = manual_cache();

        cache.set("key1", "value1".to_string(), Some(Duration::from_secs(1)));
        cache.set("key2", "value2".to_string(), Some(Duration::from_secs(10)));

        clock.advance(Duration::from_secs(2));

        assert_eq!(cache.sweep_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("key2").is_some());
        assert_eq!(cache.stats().swept, 1);
    }

    #[test]
    fn test_store_sweep_nothing_expired() {
        let (_, cache) = manual_cache();
        cache.set("key1", "value1".to_string(), None);

        assert_eq!(cache.sweep_expired(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_get_or_fetch_caches_success() {
        let (_, cache) = manual_cache();

        let first: Result<String, String> = cache
            .get_or_try_insert_with("user", None, || async { Ok("42".to_string()) })
            .await;
        assert_eq!(first.unwrap(), "42");

        // Second call must be served from cache
        let second: Result<String, String> = cache
            .get_or_try_insert_with("user", None, || async {
                Err("fetch should not run".to_string())
            })
            .await;
        assert_eq!(second.unwrap(), "42");
    }

    #[tokio::test]
    async fn test_get_or_fetch_never_caches_errors() {
        let (_, cache) = manual_cache();

        let result: Result<String, String> = cache
            .get_or_try_insert_with("user", None, || async { Err("upstream down".to_string()) })
            .await;
        assert_eq!(result.unwrap_err(), "upstream down");
        assert!(cache.is_empty());

        // A later request can retry the fetch
        let retry: Result<String, String> = cache
            .get_or_try_insert_with("user", None, || async { Ok("7".to_string()) })
            .await;
        assert_eq!(retry.unwrap(), "7");
    }

    #[tokio::test]
    async fn test_get_or_fetch_refetches_after_expiry() {
        let (clock, cache) = manual_cache();
        cache.set("user", "old".to_string(), Some(Duration::from_secs(5)));

        clock.advance(Duration::from_secs(5));

        let value: Result<String, String> = cache
            .get_or_try_insert_with("user", None, || async { Ok("fresh".to_string()) })
            .await;
        assert_eq!(value.unwrap(), "fresh");
    }

    #[test]
    fn test_concurrent_disjoint_keys() {
        let cache = Arc::new(TtlCache::<usize>::new(TTL));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..200 {
                        let key = format!("t{t}-k{i}");
                        cache.set(key.clone(), i, None);
                        assert_eq!(cache.get(&key), Some(i));
                        if i % 2 == 0 {
                            assert!(cache.delete(&key));
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 8 * 100);
        for t in 0..8 {
            for i in (1..200).step_by(2) {
                assert_eq!(cache.get(&format!("t{t}-k{i}")), Some(i));
            }
        }
    }
}
