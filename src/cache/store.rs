//! Cache Store Module
//!
//! Generic TTL map. The store knows nothing about value shape or domain;
//! callers pick a TTL per write.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, CacheStats, Clock, EntryInfo, SystemClock};

/// Cache of normalized JSON payloads shared between domain services.
pub type SharedCache = Arc<RwLock<CacheStore<Value>>>;

// == Cache Store ==
/// In-memory key/value storage with per-entry expiry.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Hit/miss counters
    stats: CacheStats,
    /// Time source for expiry decisions
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
        }
    }

    /// Wraps the store for sharing across services and tasks.
    pub fn into_shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    // == Has ==
    /// Returns true iff `key` is stored and not expired.
    pub fn has(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired(now))
            .unwrap_or(false)
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores or overwrites `key`, expiring `ttl_ms` milliseconds from now.
    ///
    /// A TTL of zero or less stores an entry that is already expired.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl_ms: i64) {
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl_ms);
        self.entries.insert(key.into(), entry);
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Delete Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn delete_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    // == Stats ==
    /// Returns counters plus a listing of every stored entry, stale ones included.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_ms();
        let mut entries: Vec<EntryInfo> = self
            .entries
            .iter()
            .map(|(key, entry)| EntryInfo {
                key: key.clone(),
                created_at: entry.created_at,
                expires_at: entry.expires_at,
                ttl_remaining_ms: entry.ttl_remaining_ms(now),
                expired: entry.is_expired(now),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        CacheStats {
            hits: self.stats.hits,
            misses: self.stats.misses,
            total_entries: self.entries.len(),
            entries,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    // == Clear ==
    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Length ==
    /// Returns the number of stored entries, including stale ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl CacheStore<Value> {
    // == Typed Get ==
    /// Reads a live JSON value and decodes it as `T`.
    ///
    /// A value that does not decode is reported as absent.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::debug!("cache entry {} did not decode: {}", key, err);
                None
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde_json::json;

    fn store_with_clock() -> (CacheStore<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (CacheStore::new(clock.clone()), clock)
    }

    #[test]
    fn test_store_new() {
        let (store, _) = store_with_clock();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock();

        store.set("key1", "value1".to_string(), 30_000);

        assert!(store.has("key1"));
        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock();

        assert!(!store.has("nonexistent"));
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let (mut store, _) = store_with_clock();

        store.set("key1", "value1".to_string(), 30_000);
        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));

        assert!(store.is_empty());
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let (mut store, clock) = store_with_clock();

        store.set("key1", "value1".to_string(), 1_000);
        clock.advance_ms(900);
        store.set("key1", "value2".to_string(), 1_000);
        clock.advance_ms(900);

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_with_clock();

        store.set("key1", "value1".to_string(), 10_000);
        clock.advance_ms(9_999);
        assert!(store.has("key1"));

        clock.advance_ms(1);
        assert!(!store.has("key1"));
        assert_eq!(store.get("key1"), None);
        // lazily purged on read
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_non_positive_ttl_never_hits() {
        let (mut store, _) = store_with_clock();

        store.set("zero", "v".to_string(), 0);
        store.set("negative", "v".to_string(), -10);

        assert!(!store.has("zero"));
        assert_eq!(store.get("zero"), None);
        assert_eq!(store.get("negative"), None);
    }

    #[test]
    fn test_store_stats_counts_hits_and_misses() {
        let (mut store, _) = store_with_clock();

        store.set("key1", "value1".to_string(), 30_000);
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_stats_lists_entries_with_expiry() {
        let (mut store, clock) = store_with_clock();
        let start = clock.now_ms();

        store.set("b", "2".to_string(), 5_000);
        store.set("a", "1".to_string(), 1_000);
        clock.advance_ms(2_000);

        let stats = store.stats();
        assert_eq!(stats.entries.len(), 2);
        assert_eq!(stats.entries[0].key, "a");
        assert!(stats.entries[0].expired);
        assert_eq!(stats.entries[0].expires_at, start + 1_000);
        assert_eq!(stats.entries[1].key, "b");
        assert!(!stats.entries[1].expired);
        assert_eq!(stats.entries[1].ttl_remaining_ms, 3_000);
    }

    #[test]
    fn test_store_delete_prefix() {
        let (mut store, _) = store_with_clock();

        store.set("dashboard:stats", "a".to_string(), 30_000);
        store.set("dashboard:stats:7d", "b".to_string(), 30_000);
        store.set("monitor:stats", "c".to_string(), 30_000);

        assert_eq!(store.delete_prefix("dashboard:"), 2);
        assert!(store.has("monitor:stats"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (mut store, clock) = store_with_clock();

        store.set("key1", "value1".to_string(), 1_000);
        store.set("key2", "value2".to_string(), 10_000);
        clock.advance_ms(1_100);

        let removed = store.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.has("key2"));
    }

    #[test]
    fn test_store_clear() {
        let (mut store, _) = store_with_clock();
        store.set("a", "1".to_string(), 1_000);
        store.set("b", "2".to_string(), 1_000);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_get_as_decodes_json() {
        let clock = Arc::new(ManualClock::default());
        let mut store: CacheStore<Value> = CacheStore::new(clock);

        store.set("nums", json!([1, 2, 3]), 1_000);
        store.set("text", json!("hello"), 1_000);

        assert_eq!(store.get_as::<Vec<u32>>("nums"), Some(vec![1, 2, 3]));
        assert_eq!(store.get_as::<Vec<u32>>("text"), None);
    }
}
