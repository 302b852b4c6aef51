//! Dashboard Client - cached data layer for the dashboard and monitor APIs
//!
//! Provides a TTL response cache, a response normalizer, cached domain
//! services and a live WebSocket relay for monitor events.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod normalize;
pub mod services;
pub mod tasks;
pub mod ws;

pub use app::App;
pub use config::Config;
pub use error::{ClientError, Result};
pub use services::{DashboardService, MonitorService};
pub use tasks::spawn_cleanup_task;
