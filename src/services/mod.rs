//! Domain Services
//!
//! Dashboard and Monitor services built on one cache-or-fetch pipeline.
//!
//! # Read pattern
//! 1. Build the cache key for the request
//! 2. On a live cache entry, return it in a freshly stamped envelope
//! 3. Otherwise GET the endpoint once
//! 4. On success, normalize and (when caching) store with the kind's TTL
//! 5. On failure, hand back the envelope as received

pub mod dashboard;
pub mod fetch;
pub mod monitor;

#[cfg(test)]
pub(crate) mod testing;

pub use dashboard::DashboardService;
pub use fetch::{CachedFetcher, PreloadReport, ReadRequest};
pub use monitor::{LiveSettings, MonitorService};
