//! Monitor Service
//!
//! Cached monitor reads under the `monitor:` namespace, plus the optional
//! live connection that relays monitor events to a caller's handler.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{keys, CacheStats, Clock, Namespace, SharedCache};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::http::HttpClient;
use crate::models::{ApiResponse, ClientInfo, EnvironmentInfo, MonitorStats};
use crate::normalize::DataKind;
use crate::services::fetch::{CachedFetcher, PreloadReport, ReadRequest};
use crate::ws::{
    generate_client_id, monitor_url, EventHandler, LiveConnection, MonitorEvent,
    ReconnectPolicy, WsEnvelope,
};

pub const MONITOR_STATS_TTL_MS: i64 = 10_000;
pub const MONITOR_CLIENTS_TTL_MS: i64 = 10_000;
pub const MONITOR_ENVIRONMENTS_TTL_MS: i64 = 30_000;

pub const MONITOR_STATS_PATH: &str = "/api/monitor/stats";
pub const MONITOR_CLIENTS_PATH: &str = "/api/monitor/clients";
pub const MONITOR_ENVIRONMENTS_PATH: &str = "/api/monitor/environments";

/// Recipient used for frames addressed to the monitor hub.
pub const SERVER_RECIPIENT: &str = "server";

/// Where and how the live connection is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveSettings {
    /// `ws://host` or `wss://host`
    pub ws_origin: String,
    pub reconnect: ReconnectPolicy,
}

impl LiveSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            ws_origin: config.live_origin()?,
            reconnect: config.reconnect_policy(),
        })
    }
}

pub struct MonitorService {
    fetcher: CachedFetcher,
    live: LiveSettings,
    connection: Mutex<Option<LiveConnection>>,
}

impl MonitorService {
    pub fn new(
        http: Arc<dyn HttpClient>,
        cache: SharedCache,
        clock: Arc<dyn Clock>,
        live: LiveSettings,
    ) -> Self {
        Self {
            fetcher: CachedFetcher::new(http, cache, clock),
            live,
            connection: Mutex::new(None),
        }
    }

    // == Cached Reads ==

    pub async fn get_stats(&self, use_cache: bool) -> ApiResponse<MonitorStats> {
        let request = ReadRequest::new(
            DataKind::MonitorStats,
            keys::monitor_stats(),
            MONITOR_STATS_PATH,
            MONITOR_STATS_TTL_MS,
        );
        self.fetcher.fetch(&request, use_cache).await
    }

    pub async fn get_clients(&self, use_cache: bool) -> ApiResponse<Vec<ClientInfo>> {
        let request = ReadRequest::new(
            DataKind::MonitorClients,
            keys::monitor_clients(),
            MONITOR_CLIENTS_PATH,
            MONITOR_CLIENTS_TTL_MS,
        );
        self.fetcher.fetch(&request, use_cache).await
    }

    pub async fn get_environments(&self, use_cache: bool) -> ApiResponse<Vec<EnvironmentInfo>> {
        let request = ReadRequest::new(
            DataKind::MonitorEnvironments,
            keys::monitor_environments(),
            MONITOR_ENVIRONMENTS_PATH,
            MONITOR_ENVIRONMENTS_TTL_MS,
        );
        self.fetcher.fetch(&request, use_cache).await
    }

    /// Drops every cached monitor entry.
    pub async fn clear_cache(&self) -> usize {
        let removed = self.fetcher.clear_namespace(Namespace::Monitor).await;
        info!("Monitor cache cleared: {} entries removed", removed);
        removed
    }

    /// Warms stats, clients and environments concurrently.
    pub async fn preload_data(&self) -> PreloadReport {
        let (stats, clients, environments) = tokio::join!(
            self.get_stats(true),
            self.get_clients(true),
            self.get_environments(true)
        );

        let mut report = PreloadReport::default();
        report.record("monitor_stats", &stats);
        report.record("monitor_clients", &clients);
        report.record("monitor_environments", &environments);
        info!(
            "Monitor preload finished: {} loaded, {} failed",
            report.loaded.len(),
            report.failed.len()
        );
        report
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.fetcher.cache_stats().await
    }

    // == Live Connection ==

    /// Opens the live connection under a freshly generated client id.
    ///
    /// Only one connection exists per service; calling this while one is
    /// active logs a warning and changes nothing.
    pub async fn connect<F>(&self, handler: F) -> Result<()>
    where
        F: Fn(MonitorEvent) + Send + Sync + 'static,
    {
        let mut slot = self.connection.lock().await;
        if let Some(existing) = slot.as_ref() {
            if existing.is_active() {
                warn!(
                    "Live connection already open for {}, ignoring connect",
                    existing.client_id()
                );
                return Ok(());
            }
        }
        if let Some(stale) = slot.take() {
            let stale_id = stale.client_id().to_string();
            if let Err(err) = stale.close().await {
                warn!("Previous live connection {} ended: {}", stale_id, err);
            }
        }

        let client_id = generate_client_id();
        let url = monitor_url(&self.live.ws_origin, &client_id);
        info!("Opening live connection {}", url);

        let handler: EventHandler = Arc::new(handler);
        *slot = Some(LiveConnection::spawn(
            client_id,
            url,
            self.live.reconnect,
            handler,
        ));
        Ok(())
    }

    /// Closes the live connection. Safe to call when none is open.
    ///
    /// Fails with the connection error when the session had already given up
    /// reconnecting.
    pub async fn disconnect(&self) -> Result<()> {
        let connection = self.connection.lock().await.take();
        match connection {
            Some(connection) => {
                info!("Closing live connection {}", connection.client_id());
                connection.close().await
            }
            None => {
                debug!("No live connection to close");
                Ok(())
            }
        }
    }

    /// True while the socket is open.
    pub async fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .await
            .as_ref()
            .map(LiveConnection::is_connected)
            .unwrap_or(false)
    }

    /// Client id of the current live connection, if any.
    pub async fn client_id(&self) -> Option<String> {
        self.connection
            .lock()
            .await
            .as_ref()
            .map(|c| c.client_id().to_string())
    }

    /// Sends a frame of type `kind` to `recipient` over the live connection.
    pub async fn send(&self, kind: &str, recipient: &str, data: Value) -> Result<()> {
        let slot = self.connection.lock().await;
        let connection = slot.as_ref().ok_or(ClientError::NotConnected)?;
        let envelope = WsEnvelope::new(kind, connection.client_id(), recipient, data);
        connection.send(envelope)
    }

    /// Sends a `ping`; the hub answers with a `pong` event.
    pub async fn ping(&self) -> Result<()> {
        self.send("ping", SERVER_RECIPIENT, Value::Null).await
    }
}
