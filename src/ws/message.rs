//! Live connection message types.
//!
//! Every frame must be a [`WsEnvelope`] with all four fields present. Known
//! `type` tags are turned into [`MonitorMessage`] variants; anything that
//! does not parse is dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::models::{ClientInfo, EnvironmentInfo, MonitorStats};
use crate::normalize::{self, DataKind};

/// Raw `{ type, sender, recipient, data }` frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub sender: String,
    pub recipient: String,
    pub data: Value,
}

impl WsEnvelope {
    pub fn new(
        kind: impl Into<String>,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            kind: kind.into(),
            sender: sender.into(),
            recipient: recipient.into(),
            data,
        }
    }
}

/// Decoded payload of a live frame, one variant per message type.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorMessage {
    StatsUpdate(MonitorStats),
    ClientConnected(ClientInfo),
    ClientDisconnected { client_id: String },
    EnvironmentsUpdate(Vec<EnvironmentInfo>),
    Pong,
    Error { message: String },
    /// Well-formed envelope with a type this client does not know
    Other(WsEnvelope),
}

/// A decoded frame plus its routing fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorEvent {
    pub sender: String,
    pub recipient: String,
    pub message: MonitorMessage,
}

// == Parsing ==
/// Parses a text frame. Returns `None` for anything malformed.
pub fn parse_event(text: &str) -> Option<MonitorEvent> {
    let envelope: WsEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            debug!("dropping malformed live message: {}", err);
            return None;
        }
    };

    let sender = envelope.sender.clone();
    let recipient = envelope.recipient.clone();
    let message = decode_message(envelope)?;
    Some(MonitorEvent {
        sender,
        recipient,
        message,
    })
}

fn decode_message(envelope: WsEnvelope) -> Option<MonitorMessage> {
    let message = match envelope.kind.as_str() {
        "stats_update" | "monitor_stats" => {
            MonitorMessage::StatsUpdate(decode_data(DataKind::MonitorStats, envelope.data)?)
        }
        "client_connected" => {
            MonitorMessage::ClientConnected(decode_data(DataKind::MonitorClient, envelope.data)?)
        }
        "client_disconnected" => {
            let client: ClientInfo = decode_data(DataKind::MonitorClient, envelope.data)?;
            MonitorMessage::ClientDisconnected {
                client_id: client.client_id,
            }
        }
        "environments_update" => MonitorMessage::EnvironmentsUpdate(decode_data(
            DataKind::MonitorEnvironments,
            envelope.data,
        )?),
        "pong" => MonitorMessage::Pong,
        "error" => MonitorMessage::Error {
            message: error_message(&envelope.data),
        },
        _ => MonitorMessage::Other(envelope),
    };
    Some(message)
}

fn decode_data<T: serde::de::DeserializeOwned>(kind: DataKind, data: Value) -> Option<T> {
    match normalize::decode(kind, data) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("dropping live message with undecodable data: {}", err);
            None
        }
    }
}

fn error_message(data: &Value) -> String {
    match data {
        Value::String(message) => message.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| data.to_string()),
        Value::Null => "unknown error".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(value: Value) -> String {
        value.to_string()
    }

    #[test]
    fn test_stats_update_is_normalized() {
        let event = parse_event(&frame(json!({
            "type": "stats_update",
            "sender": "server",
            "recipient": "client-1",
            "data": {"total_clients": 4, "uptime": "60"}
        })))
        .unwrap();

        assert_eq!(event.sender, "server");
        assert_eq!(event.recipient, "client-1");
        match event.message {
            MonitorMessage::StatsUpdate(stats) => {
                assert_eq!(stats.total_clients, 4);
                assert_eq!(stats.uptime_seconds, 60);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_missing_sender_is_dropped() {
        let text = frame(json!({
            "type": "stats_update",
            "recipient": "client-1",
            "data": {}
        }));
        assert!(parse_event(&text).is_none());
    }

    #[test]
    fn test_missing_data_is_dropped() {
        let text = frame(json!({"type": "pong", "sender": "s", "recipient": "r"}));
        assert!(parse_event(&text).is_none());
    }

    #[test]
    fn test_null_data_counts_as_present() {
        let text = frame(json!({"type": "pong", "sender": "s", "recipient": "r", "data": null}));
        assert_eq!(parse_event(&text).unwrap().message, MonitorMessage::Pong);
    }

    #[test]
    fn test_non_json_is_dropped() {
        assert!(parse_event("hello").is_none());
        assert!(parse_event("[1,2,3]").is_none());
    }

    #[test]
    fn test_client_disconnected_accepts_bare_id() {
        let text = frame(json!({
            "type": "client_disconnected",
            "sender": "server",
            "recipient": "*",
            "data": "client-9"
        }));
        assert_eq!(
            parse_event(&text).unwrap().message,
            MonitorMessage::ClientDisconnected {
                client_id: "client-9".to_string()
            }
        );
    }

    #[test]
    fn test_error_message_variants() {
        assert_eq!(error_message(&json!("boom")), "boom");
        assert_eq!(error_message(&json!({"message": "bad"})), "bad");
        assert_eq!(error_message(&Value::Null), "unknown error");
    }

    #[test]
    fn test_unknown_type_is_passed_through() {
        let text = frame(json!({
            "type": "custom",
            "sender": "a",
            "recipient": "b",
            "data": [1]
        }));
        match parse_event(&text).unwrap().message {
            MonitorMessage::Other(envelope) => {
                assert_eq!(envelope.kind, "custom");
                assert_eq!(envelope.data, json!([1]));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_envelope_serializes_type_field() {
        let json =
            serde_json::to_value(WsEnvelope::new("ping", "c1", "server", Value::Null)).unwrap();
        assert_eq!(json["type"], "ping");
        assert!(json.get("kind").is_none());
    }
}
