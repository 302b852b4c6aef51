//! Data models for the dashboard client
//!
//! The response envelope plus the canonical payload types the normalizer
//! produces and the services hand back to callers.

pub mod dashboard;
pub mod envelope;
pub mod monitor;

// Re-export commonly used types
pub use dashboard::{Activity, DashboardStats, RealtimeStats, TrendPoint};
pub use envelope::{ApiResponse, ErrorInfo};
pub use monitor::{ClientInfo, EnvironmentInfo, MonitorStats};
