//! Cache-or-fetch pipeline shared by the domain services.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStats, Clock, Namespace, SharedCache};
use crate::error::ClientError;
use crate::http::HttpClient;
use crate::models::{ApiResponse, ErrorInfo};
use crate::normalize::{self, DataKind};

// == Read Request ==
/// Everything needed to serve one logical read.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub kind: DataKind,
    pub key: CacheKey,
    pub path: &'static str,
    pub query: Vec<(String, String)>,
    pub ttl_ms: i64,
}

impl ReadRequest {
    pub fn new(kind: DataKind, key: CacheKey, path: &'static str, ttl_ms: i64) -> Self {
        Self {
            kind,
            key,
            path,
            query: Vec::new(),
            ttl_ms,
        }
    }

    /// Adds a query parameter, skipping absent or blank values.
    pub fn with_param(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.query.push((name.to_string(), value.to_string()));
        }
        self
    }
}

// == Cached Fetcher ==
/// Serves reads from the shared cache, falling back to one HTTP request.
///
/// Two concurrent misses on the same key may both fetch and both write;
/// the last write wins and both carry the same TTL.
#[derive(Clone)]
pub struct CachedFetcher {
    http: Arc<dyn HttpClient>,
    cache: SharedCache,
    clock: Arc<dyn Clock>,
}

impl CachedFetcher {
    pub fn new(http: Arc<dyn HttpClient>, cache: SharedCache, clock: Arc<dyn Clock>) -> Self {
        Self { http, cache, clock }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Runs the cache-or-fetch sequence for `request`.
    ///
    /// Hits are wrapped in a success envelope stamped with the current time,
    /// not the time of the original fetch. Failed responses are returned as
    /// received and are neither normalized nor cached.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: &ReadRequest,
        use_cache: bool,
    ) -> ApiResponse<T> {
        let key = request.key.as_str();

        if use_cache {
            let cached = self.cache.write().await.get(key);
            if let Some(data) = cached {
                match serde_json::from_value::<T>(data) {
                    Ok(value) => {
                        debug!("cache hit for {}", key);
                        return ApiResponse::ok(value, self.clock.now());
                    }
                    Err(err) => warn!(
                        "cached value for {} did not decode, refetching: {}",
                        key, err
                    ),
                }
            } else {
                debug!("cache miss for {}", key);
            }
        }

        let raw = self.http.get(request.path, &request.query).await;
        if !raw.success {
            warn!(
                "request for {} failed: {}",
                request.path,
                raw.error.as_ref().map(|e| e.message.as_str()).unwrap_or("unknown error")
            );
            return raw.into_failure();
        }

        let normalized = normalize::process_response(request.kind, raw);
        let data = normalized.data.unwrap_or(Value::Null);
        match serde_json::from_value::<T>(data.clone()) {
            Ok(value) => {
                if use_cache {
                    self.cache.write().await.set(key, data, request.ttl_ms);
                    debug!("cached {} for {}ms", key, request.ttl_ms);
                }
                ApiResponse {
                    data: Some(value),
                    success: true,
                    timestamp: normalized.timestamp,
                    error: normalized.error,
                }
            }
            Err(err) => {
                let err = ClientError::Serialization(err);
                warn!(
                    "normalized payload for {} did not decode: {}",
                    request.path, err
                );
                ApiResponse::failure(ErrorInfo::from(&err), normalized.timestamp)
            }
        }
    }

    /// Removes every entry under `namespace`, found through the stats listing.
    ///
    /// Returns the number of entries removed.
    pub async fn clear_namespace(&self, namespace: Namespace) -> usize {
        let mut cache = self.cache.write().await;
        let keys = cache.stats().keys_with_prefix(&namespace.prefix());
        for key in &keys {
            cache.delete(key);
        }
        keys.len()
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }
}

// == Preload Report ==
/// Outcome of a best-effort warm-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadReport {
    /// Reads that completed and were cached
    pub loaded: Vec<&'static str>,
    /// Reads that failed, with their error message
    pub failed: Vec<(&'static str, String)>,
}

impl PreloadReport {
    /// Records one sub-fetch outcome.
    pub fn record<T>(&mut self, name: &'static str, response: &ApiResponse<T>) {
        if response.success {
            self.loaded.push(name);
        } else {
            let message = response
                .error
                .as_ref()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "unknown error".to_string());
            warn!("preload of {} failed: {}", name, message);
            self.failed.push((name, message));
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
