//! Response Normalizer
//!
//! The data compatibility layer: rewrites raw API payloads into one canonical
//! layout regardless of backend version skew. Everything here is pure. The
//! same input always yields the same output, and normalizing an already
//! normalized payload changes nothing.
//!
//! The pass runs in two steps:
//! 1. every object key is folded to camelCase ([`case`]),
//! 2. the payload is rewritten against the schema of its [`DataKind`]:
//!    legacy aliases are renamed, loosely typed values are coerced and
//!    missing fields receive their defaults ([`schema`]).

pub mod case;
pub mod schema;


use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::models::ApiResponse;

use schema::{
    Schema, CLIENT_INFO, DASHBOARD_STATS, ENVIRONMENT_INFO, MONITOR_STATS, REALTIME_STATS,
};

// == Data Kind ==
/// Which canonical shape a payload is expected to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    DashboardStats,
    RealtimeStats,
    MonitorStats,
    /// A single client record, as pushed over the live connection
    MonitorClient,
    MonitorClients,
    MonitorEnvironments,
}

enum Shape {
    Object(&'static Schema),
    List(&'static Schema),
}

impl DataKind {
    fn shape(&self) -> Shape {
        match self {
            DataKind::DashboardStats => Shape::Object(&DASHBOARD_STATS),
            DataKind::RealtimeStats => Shape::Object(&REALTIME_STATS),
            DataKind::MonitorStats => Shape::Object(&MONITOR_STATS),
            DataKind::MonitorClient => Shape::Object(&CLIENT_INFO),
            DataKind::MonitorClients => Shape::List(&CLIENT_INFO),
            DataKind::MonitorEnvironments => Shape::List(&ENVIRONMENT_INFO),
        }
    }
}

// == Normalize Data ==
/// Rewrites a bare payload into the canonical layout of `kind`.
pub fn normalize_data(kind: DataKind, data: Value) -> Value {
    let data = case::camelize_keys(data);
    match kind.shape() {
        Shape::Object(schema) => schema::apply_object(schema, data),
        Shape::List(schema) => schema::apply_list(schema, data),
    }
}

// == Process Response ==
/// Normalizes the `data` of a successful envelope.
///
/// `success`, `timestamp` and `error` pass through untouched. Failed
/// envelopes are returned exactly as given. A successful envelope without
/// data is treated as an empty payload and receives the kind's defaults.
pub fn process_response(kind: DataKind, raw: ApiResponse<Value>) -> ApiResponse<Value> {
    if !raw.success {
        return raw;
    }
    let data = raw.data.unwrap_or(Value::Null);
    ApiResponse {
        data: Some(normalize_data(kind, data)),
        success: true,
        timestamp: raw.timestamp,
        error: raw.error,
    }
}

/// Normalizes `data` and decodes it into its typed model.
pub fn decode<T: DeserializeOwned>(kind: DataKind, data: Value) -> Result<T> {
    Ok(serde_json::from_value(normalize_data(kind, data))?)
}
