//! Dashboard Service
//!
//! Aggregate and realtime dashboard stats, cached under the `dashboard:`
//! namespace.

use std::sync::Arc;

use tracing::info;

use crate::cache::{keys, CacheStats, Clock, Namespace, SharedCache};
use crate::http::HttpClient;
use crate::models::{ApiResponse, DashboardStats, RealtimeStats};
use crate::normalize::DataKind;
use crate::services::fetch::{CachedFetcher, PreloadReport, ReadRequest};

/// TTL for aggregate dashboard stats.
pub const DASHBOARD_STATS_TTL_MS: i64 = 30_000;
/// TTL for realtime stats.
pub const REALTIME_STATS_TTL_MS: i64 = 10_000;

pub const DASHBOARD_STATS_PATH: &str = "/dashboard/stats";
pub const REALTIME_STATS_PATH: &str = "/stats/realtime";

#[derive(Clone)]
pub struct DashboardService {
    fetcher: CachedFetcher,
}

impl DashboardService {
    pub fn new(http: Arc<dyn HttpClient>, cache: SharedCache, clock: Arc<dyn Clock>) -> Self {
        Self {
            fetcher: CachedFetcher::new(http, cache, clock),
        }
    }

    /// `GET /dashboard/stats[?range=..]`, cached for 30 seconds per range.
    pub async fn get_stats(
        &self,
        range: Option<&str>,
        use_cache: bool,
    ) -> ApiResponse<DashboardStats> {
        let request = ReadRequest::new(
            DataKind::DashboardStats,
            keys::dashboard_stats(range),
            DASHBOARD_STATS_PATH,
            DASHBOARD_STATS_TTL_MS,
        )
        .with_param("range", range);
        self.fetcher.fetch(&request, use_cache).await
    }

    /// `GET /stats/realtime`, cached for 10 seconds.
    pub async fn get_realtime_stats(&self, use_cache: bool) -> ApiResponse<RealtimeStats> {
        let request = ReadRequest::new(
            DataKind::RealtimeStats,
            keys::realtime_stats(),
            REALTIME_STATS_PATH,
            REALTIME_STATS_TTL_MS,
        );
        self.fetcher.fetch(&request, use_cache).await
    }

    /// Drops every cached dashboard entry. Other namespaces are untouched.
    pub async fn clear_cache(&self) -> usize {
        let removed = self.fetcher.clear_namespace(Namespace::Dashboard).await;
        info!("Dashboard cache cleared: {} entries removed", removed);
        removed
    }

    /// Warms the cache with default-range stats and realtime stats.
    ///
    /// Both reads run concurrently; a failure in one is logged and reported
    /// but never aborts the other.
    pub async fn preload_data(&self) -> PreloadReport {
        let (stats, realtime) =
            tokio::join!(self.get_stats(None, true), self.get_realtime_stats(true));

        let mut report = PreloadReport::default();
        report.record("dashboard_stats", &stats);
        report.record("realtime_stats", &realtime);
        info!(
            "Dashboard preload finished: {} loaded, {} failed",
            report.loaded.len(),
            report.failed.len()
        );
        report
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.fetcher.cache_stats().await
    }
}
