//! Dashboard payloads in their canonical (normalized) layout.

use serde::{Deserialize, Serialize};

/// Aggregate dashboard numbers for a time range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_interviews: u64,
    pub completed_interviews: u64,
    pub average_score: f64,
    pub recent_activities: Vec<Activity>,
    pub trend: Vec<TrendPoint>,
}

impl DashboardStats {
    /// Share of interviews that were completed, 0.0 when there are none.
    pub fn completion_rate(&self) -> f64 {
        if self.total_interviews == 0 {
            0.0
        } else {
            self.completed_interviews as f64 / self.total_interviews as f64
        }
    }
}

/// One line in the "recent activity" feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    pub id: String,
    pub kind: String,
    pub description: String,
    pub created_at: Option<String>,
}

/// A labelled sample of a trend chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

/// Short-lived live counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealtimeStats {
    pub online_users: u64,
    pub active_sessions: u64,
    pub requests_per_minute: f64,
    pub updated_at: Option<String>,
}
