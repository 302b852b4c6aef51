//! Configuration Module
//!
//! Handles loading and managing client configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ClientError, Result};
use crate::ws::{ws_origin, ReconnectPolicy};

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base address of the backend API
    pub api_base_url: String,
    /// Per-request HTTP timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Explicit origin for the live connection, overriding the API base
    pub ws_base_url: Option<String>,
    /// Reconnect attempts after the live connection drops
    pub ws_max_reconnect_attempts: u32,
    /// Fixed pause before each reconnect attempt, in milliseconds
    pub ws_reconnect_delay_ms: u64,
    /// Background cache sweep interval in seconds
    pub cleanup_interval: u64,
    /// Whether the binary opens the monitor live connection
    pub monitor_live: bool,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Backend address (default: http://localhost:8000)
    /// - `REQUEST_TIMEOUT_MS` - HTTP timeout (default: 10000)
    /// - `WS_BASE_URL` - Live connection origin (default: derived from API_BASE_URL)
    /// - `WS_MAX_RECONNECT_ATTEMPTS` - Reconnect attempts (default: 5)
    /// - `WS_RECONNECT_DELAY_MS` - Delay between attempts (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cache sweep frequency in seconds (default: 30)
    /// - `MONITOR_LIVE` - Open the monitor live connection (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            ws_base_url: env::var("WS_BASE_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            ws_max_reconnect_attempts: env_or(
                "WS_MAX_RECONNECT_ATTEMPTS",
                defaults.ws_max_reconnect_attempts,
            ),
            ws_reconnect_delay_ms: env_or("WS_RECONNECT_DELAY_MS", defaults.ws_reconnect_delay_ms),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            monitor_live: env_or("MONITOR_LIVE", defaults.monitor_live),
        }
    }

    /// Rejects values the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(ClientError::Config("API_BASE_URL is empty".to_string()));
        }
        if self.cleanup_interval == 0 {
            return Err(ClientError::Config(
                "CLEANUP_INTERVAL must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ClientError::Config(
                "REQUEST_TIMEOUT_MS must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// `ws://` or `wss://` origin for the live connection.
    pub fn live_origin(&self) -> Result<String> {
        ws_origin(self.ws_base_url.as_deref().unwrap_or(&self.api_base_url))
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts: self.ws_max_reconnect_attempts,
            delay: Duration::from_millis(self.ws_reconnect_delay_ms),
        }
    }

    pub fn cleanup_period(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 10_000,
            ws_base_url: None,
            ws_max_reconnect_attempts: 5,
            ws_reconnect_delay_ms: 3000,
            cleanup_interval: 30,
            monitor_live: true,
        }
    }
}
