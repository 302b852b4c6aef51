//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and namespaced keys.

mod clock;
mod entry;
pub mod keys;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use keys::{CacheKey, Namespace};
pub use stats::{CacheStats, EntryInfo};
pub use store::{CacheStore, SharedCache};
