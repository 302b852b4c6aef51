//! Cache Key Module
//!
//! Deterministic, namespaced key construction. A key reads
//! `<namespace>:<resource>[:<qualifier>]`.

use std::fmt;

/// Separator between key segments.
pub const KEY_SEPARATOR: char = ':';

// == Namespace ==
/// Owning domain of a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Dashboard,
    Monitor,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Dashboard => "dashboard",
            Namespace::Monitor => "monitor",
        }
    }

    /// Prefix shared by every key in this namespace, e.g. `dashboard:`.
    pub fn prefix(&self) -> String {
        format!("{}{}", self.as_str(), KEY_SEPARATOR)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Cache Key ==
/// A fully built cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: Namespace,
    key: String,
}

impl CacheKey {
    /// Key for `resource` under `namespace`, without qualifier.
    pub fn new(namespace: Namespace, resource: &str) -> Self {
        Self {
            namespace,
            key: format!("{}{}{}", namespace.as_str(), KEY_SEPARATOR, resource),
        }
    }

    /// Appends a qualifier segment. Empty or blank qualifiers are ignored so
    /// `Some("")` and `None` map to the same key.
    pub fn with_qualifier(mut self, qualifier: Option<&str>) -> Self {
        if let Some(q) = qualifier.map(str::trim).filter(|q| !q.is_empty()) {
            self.key.push(KEY_SEPARATOR);
            self.key.push_str(q);
        }
        self
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

// == Builders ==
/// Aggregate dashboard stats, optionally qualified by a time range such as `7d`.
pub fn dashboard_stats(range: Option<&str>) -> CacheKey {
    CacheKey::new(Namespace::Dashboard, "stats").with_qualifier(range)
}

pub fn realtime_stats() -> CacheKey {
    CacheKey::new(Namespace::Dashboard, "realtime")
}

pub fn monitor_stats() -> CacheKey {
    CacheKey::new(Namespace::Monitor, "stats")
}

pub fn monitor_clients() -> CacheKey {
    CacheKey::new(Namespace::Monitor, "clients")
}

pub fn monitor_environments() -> CacheKey {
    CacheKey::new(Namespace::Monitor, "environments")
}
