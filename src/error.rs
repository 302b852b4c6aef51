//! Error types for the dashboard client
//!
//! Provides unified error handling using thiserror. Read operations on the
//! services never return these directly; they are folded into failed
//! envelopes through [`crate::models::ErrorInfo`].

use thiserror::Error;

// == Client Error Enum ==
/// Unified error type for the dashboard client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport level HTTP failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// WebSocket handshake or stream failure
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    /// No live connection is open
    #[error("Live connection is not open")]
    NotConnected,

    /// JSON encode/decode failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed base or endpoint URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// Internal client error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

impl ClientError {
    /// Stable machine readable code for envelopes and logs.
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Http(err) if err.is_timeout() => "TIMEOUT",
            ClientError::Http(_) => "NETWORK_ERROR",
            ClientError::Status { .. } => "HTTP_STATUS",
            ClientError::WebSocket(_) => "WEBSOCKET_ERROR",
            ClientError::NotConnected => "NOT_CONNECTED",
            ClientError::Serialization(_) => "DECODE_ERROR",
            ClientError::InvalidUrl(_) => "INVALID_URL",
            ClientError::Config(_) => "CONFIG_ERROR",
            ClientError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status associated with the failure, if there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the dashboard client.
pub type Result<T> = std::result::Result<T, ClientError>;
