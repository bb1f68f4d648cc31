//! Response shapes produced by the aggregation engine.

use serde::{Deserialize, Serialize};

/// Overall KPI summary.
///
/// `active_agents` is the lifetime count of distinct agent ids, not a
/// recency window. The name is kept for client compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiStats {
    pub total_runs: usize,
    pub completed: usize,
    pub failed: usize,
    pub avg_completion_time: f64,
    pub active_agents: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    pub agent_id: i64,
    pub total_runs: usize,
    pub completed: usize,
    pub failed: usize,
    pub avg_completion_time: f64,
}

/// Roster entry: how many runs an agent has and its mean feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRunCount {
    pub agent_id: i64,
    pub run_count: usize,
    pub avg_feedback: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}
