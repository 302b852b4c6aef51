//! HTTP Module
//!
//! Thin GET client that turns every backend answer, including transport
//! failures, into an [`ApiResponse`] envelope.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::Clock;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{ApiResponse, ErrorInfo};

/// Query string pairs attached to a request.
pub type Query = [(String, String)];

// == Http Client Trait ==
/// Request/response transport used by the domain services.
///
/// Implementations never fail: errors come back as `success: false` envelopes.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, path: &str, query: &Query) -> ApiResponse<Value>;
}

// == Rest Client ==
/// [`HttpClient`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl RestClient {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(format!(
                "API base must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            clock,
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_millis(config.request_timeout_ms),
            clock,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(&self, path: &str, query: &Query) -> Result<ApiResponse<Value>> {
        let mut request = self.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(envelope_from_body(status, &body, self.clock.now()))
    }
}

#[async_trait]
impl HttpClient for RestClient {
    async fn get(&self, path: &str, query: &Query) -> ApiResponse<Value> {
        debug!("GET {}{}", self.base_url, path);
        match self.send(path, query).await {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!("GET {} failed: {}", path, err);
                ApiResponse::failure(ErrorInfo::from(&err), self.clock.now())
            }
        }
    }
}

// == Body Decoding ==
/// Builds an envelope from a raw status code and response body.
///
/// A JSON object with a boolean `success` is read as a backend envelope;
/// any other successful JSON body is the payload itself.
pub fn envelope_from_body(
    status: u16,
    body: &str,
    timestamp: DateTime<Utc>,
) -> ApiResponse<Value> {
    let trimmed = body.trim();
    let parsed = if trimmed.is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(trimmed)
    };

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .as_ref()
            .and_then(error_info_from_body)
            .map(|info| info.message)
            .unwrap_or_else(|| format!("request failed with status {}", status));
        let err = ClientError::Status { status, message };
        return ApiResponse::failure(ErrorInfo::from(&err), timestamp);
    }

    let value = match parsed {
        Ok(value) => value,
        Err(err) => {
            let err = ClientError::Serialization(err);
            return ApiResponse::failure(ErrorInfo::from(&err).with_status(status), timestamp);
        }
    };

    match value.get("success").and_then(Value::as_bool) {
        Some(true) => {
            let data = value.get("data").cloned().unwrap_or(Value::Null);
            ApiResponse::ok(data, timestamp)
        }
        Some(false) => {
            let info = error_info_from_body(&value)
                .unwrap_or_else(|| ErrorInfo::new("backend reported failure"))
                .with_status(status);
            ApiResponse::failure(info, timestamp)
        }
        None => ApiResponse::ok(value, timestamp),
    }
}

/// Pulls an error description out of `error` / `message` / `detail` fields.
fn error_info_from_body(body: &Value) -> Option<ErrorInfo> {
    match body.get("error") {
        Some(Value::String(message)) => return Some(ErrorInfo::new(message.clone())),
        Some(Value::Object(obj)) => {
            if let Some(message) = obj.get("message").and_then(Value::as_str) {
                let mut info = ErrorInfo::new(message);
                if let Some(code) = obj.get("code").and_then(Value::as_str) {
                    info = info.with_code(code);
                }
                return Some(info);
            }
        }
        _ => {}
    }

    ["message", "detail"]
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_str))
        .map(ErrorInfo::new)
}
