//! Response envelope shared by every API call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Error details carried by a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Human readable description
    pub message: String,
    /// Backend or client error code, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// HTTP status, when the failure came from a response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            status: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl From<&ClientError> for ErrorInfo {
    fn from(err: &ClientError) -> Self {
        let info = ErrorInfo::new(err.to_string()).with_code(err.code());
        match err.status() {
            Some(status) => info.with_status(status),
            None => info,
        }
    }
}

/// `{ data, success, timestamp, error }` wrapper returned by every read.
///
/// The constructors keep `success` and `data` consistent: a successful
/// envelope always has data and a failed one never does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T, timestamp: DateTime<Utc>) -> Self {
        Self {
            data: Some(data),
            success: true,
            timestamp,
            error: None,
        }
    }

    /// Failed envelope with no data.
    pub fn failure(error: ErrorInfo, timestamp: DateTime<Utc>) -> Self {
        Self {
            data: None,
            success: false,
            timestamp,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Transforms the payload, leaving the rest of the envelope intact.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: self.data.map(f),
            success: self.success,
            timestamp: self.timestamp,
            error: self.error,
        }
    }

    /// Re-types a failed envelope. Any payload is discarded.
    pub fn into_failure<U>(self) -> ApiResponse<U> {
        ApiResponse {
            data: None,
            success: false,
            timestamp: self.timestamp,
            error: self.error,
        }
    }
}
