//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
///
/// Timestamps are Unix milliseconds taken from the store's clock, so an entry
/// never reads the wall clock on its own.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: i64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl_ms` after `now_ms`.
    ///
    /// A zero or negative TTL produces an entry that is already expired.
    pub fn new(value: V, now_ms: i64, ttl_ms: i64) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is visible only while `now < expires_at`, so it is expired
    /// as soon as the full TTL has elapsed.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self, now_ms: i64) -> u64 {
        self.expires_at.saturating_sub(now_ms).max(0) as u64
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_000_000;

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value", NOW, 60_000);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.created_at, NOW);
        assert_eq!(entry.expires_at, NOW + 60_000);
        assert!(!entry.is_expired(NOW));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", NOW, 1_000);

        assert!(!entry.is_expired(NOW + 999));
        assert!(entry.is_expired(NOW + 1_000));
        assert!(entry.is_expired(NOW + 5_000));
    }

    #[test]
    fn test_zero_ttl_is_already_expired() {
        let entry = CacheEntry::new(1u32, NOW, 0);
        assert!(entry.is_expired(NOW));
    }

    #[test]
    fn test_negative_ttl_is_already_expired() {
        let entry = CacheEntry::new(1u32, NOW, -500);
        assert!(entry.is_expired(NOW));
        assert_eq!(entry.ttl_remaining_ms(NOW), 0);
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::new("v", NOW, 10_000);

        assert_eq!(entry.ttl_remaining_ms(NOW), 10_000);
        assert_eq!(entry.ttl_remaining_ms(NOW + 2_500), 7_500);
        assert_eq!(entry.ttl_remaining_ms(NOW + 20_000), 0);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new("v", NOW, i64::MAX);
        assert_eq!(entry.expires_at, i64::MAX);
        assert!(!entry.is_expired(NOW));
    }

    #[test]
    fn test_ttl_remaining_with_pre_epoch_clock() {
        let entry = CacheEntry::new(1u8, -10, i64::MAX);
        assert_eq!(entry.ttl_remaining_ms(i64::MIN + 1), i64::MAX as u64);

        let stale = CacheEntry::new(1u8, i64::MIN + 1, 5);
        assert_eq!(stale.ttl_remaining_ms(i64::MAX), 0);
    }
}
