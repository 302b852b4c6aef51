//! Application wiring
//!
//! Builds the shared cache, HTTP client and both services from a [`Config`].

use std::sync::Arc;

use crate::cache::{CacheStore, Clock, SharedCache, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::http::{HttpClient, RestClient};
use crate::services::{DashboardService, LiveSettings, MonitorService, PreloadReport};

/// Everything a caller needs, sharing one cache and one clock.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub cache: SharedCache,
    pub dashboard: DashboardService,
    pub monitor: Arc<MonitorService>,
}

impl App {
    /// Creates the app from configuration with the system clock.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let http: Arc<dyn HttpClient> = Arc::new(RestClient::from_config(config, clock.clone())?);
        Self::with_http(config, http, clock)
    }

    /// Wires the services over an arbitrary transport.
    pub fn with_http(
        config: &Config,
        http: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let cache = CacheStore::new(clock.clone()).into_shared();
        let live = LiveSettings::from_config(config)?;

        Ok(Self {
            config: config.clone(),
            dashboard: DashboardService::new(http.clone(), cache.clone(), clock.clone()),
            monitor: Arc::new(MonitorService::new(http, cache.clone(), clock, live)),
            cache,
        })
    }

    /// Warms both services concurrently.
    pub async fn preload(&self) -> (PreloadReport, PreloadReport) {
        tokio::join!(self.dashboard.preload_data(), self.monitor.preload_data())
    }
}
