pub mod run;
pub mod stats;

pub use run::{AgentRun, NewAgentRun, RunFilter};
pub use stats::{AgentRunCount, AgentStats, FeedbackStats, KpiStats, StatusCount, TimelineEntry};
