//! Cache Statistics Module
//!
//! Tracks hit/miss counters and exposes a per-entry listing for maintenance
//! tasks such as namespace-prefix deletion.

use serde::Serialize;

// == Entry Info ==
/// Introspection record for a single stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    /// Entry key
    pub key: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: i64,
    /// Remaining lifetime in milliseconds, 0 when stale
    pub ttl_remaining_ms: u64,
    /// Whether the entry is stale but not yet purged
    pub expired: bool,
}

// == Cache Stats ==
/// Snapshot of cache counters and entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Current number of stored entries, live and stale
    pub total_entries: usize,
    /// Every stored entry, sorted by key
    pub entries: Vec<EntryInfo>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Live Entries ==
    /// Number of listed entries that have not expired.
    pub fn live_entries(&self) -> usize {
        self.entries.iter().filter(|e| !e.expired).count()
    }

    // == Keys With Prefix ==
    /// Keys of all listed entries starting with `prefix`.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.key.starts_with(prefix))
            .map(|e| e.key.clone())
            .collect()
    }
}
