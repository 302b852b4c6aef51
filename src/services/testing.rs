//! Scripted [`HttpClient`] for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::http::{HttpClient, Query};
use crate::models::{ApiResponse, ErrorInfo};

#[derive(Debug, Clone)]
enum Scripted {
    Ok(Value),
    Failure(String),
}

/// Answers each path with a fixed envelope and counts the calls it receives.
#[derive(Debug, Default)]
pub struct MockHttp {
    responses: HashMap<String, Scripted>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ok(mut self, path: &str, data: Value) -> Self {
        self.responses.insert(path.to_string(), Scripted::Ok(data));
        self
    }

    pub fn with_failure(mut self, path: &str, message: &str) -> Self {
        self.responses
            .insert(path.to_string(), Scripted::Failure(message.to_string()));
        self
    }

    /// Number of requests made to `path`.
    pub fn calls(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .count()
    }

    /// Query strings sent to `path`, in call order.
    pub fn queries(&self, path: &str) -> Vec<Vec<(String, String)>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, q)| q.clone())
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    async fn get(&self, path: &str, query: &Query) -> ApiResponse<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), query.to_vec()));

        match self.responses.get(path) {
            Some(Scripted::Ok(data)) => ApiResponse::ok(data.clone(), Utc::now()),
            Some(Scripted::Failure(message)) => {
                ApiResponse::failure(ErrorInfo::new(message.clone()), Utc::now())
            }
            None => ApiResponse::failure(
                ErrorInfo::new(format!("no route for {}", path)).with_status(404),
                Utc::now(),
            ),
        }
    }
}
