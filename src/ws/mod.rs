//! Live Connection Module
//!
//! WebSocket client for monitor events: envelope validation, tagged message
//! decoding, and a reconnecting connection task.

pub mod connection;
pub mod message;

pub use connection::{
    generate_client_id, monitor_url, ws_origin, EventHandler, LiveConnection, ReconnectPolicy,
};
pub use message::{parse_event, MonitorEvent, MonitorMessage, WsEnvelope};
