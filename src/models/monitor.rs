//! Monitor payloads in their canonical (normalized) layout.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorStats {
    pub total_clients: u64,
    pub active_connections: u64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub uptime_seconds: u64,
}

/// A client attached to the monitor hub.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientInfo {
    pub client_id: String,
    pub environment: String,
    pub status: String,
    pub connected_at: Option<String>,
    pub last_seen: Option<String>,
}

impl ClientInfo {
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online") || self.status.eq_ignore_ascii_case("connected")
    }
}

/// A deployment environment and how many clients report from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentInfo {
    pub name: String,
    pub client_count: u64,
    pub status: String,
}
