//! Aggregation engine.
//!
//! Every function here is pure: it takes the runs to summarise as an explicit
//! slice and never touches storage. Malformed records are never an error.
//! They are dropped from timestamp-dependent statistics and counted as
//! neutral feedback, so each function returns a complete result for any
//! input, including the empty slice.

pub mod timestamp;

use std::collections::{BTreeMap, HashSet};

use crate::domain::{
    AgentRun, AgentRunCount, AgentStats, FeedbackStats, KpiStats, StatusCount, TimelineEntry,
};

pub use timestamp::{calendar_date, canonicalize, parse_timestamp};

pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

/// Seconds between creation and completion of a completed run.
///
/// `None` when the run is not completed, has no completion time, either
/// timestamp fails to parse, or completion precedes creation.
pub fn completion_seconds(run: &AgentRun) -> Option<f64> {
    if run.status != STATUS_COMPLETED {
        return None;
    }
    let completed_at = parse_timestamp(run.completed_at.as_deref()?)?;
    let created_at = parse_timestamp(&run.created_at)?;

    let elapsed = completed_at - created_at;
    #[allow(clippy::cast_precision_loss)]
    let seconds = elapsed.num_seconds() as f64 + f64::from(elapsed.subsec_nanos()) / 1e9;
    (seconds >= 0.0).then_some(seconds)
}

/// Mean completion time in seconds, rounded to 2 places; `0.0` if no run
/// qualifies.
pub fn average_completion_seconds<'a>(runs: impl IntoIterator<Item = &'a AgentRun>) -> f64 {
    let (total, valid) = runs
        .into_iter()
        .filter_map(completion_seconds)
        .fold((0.0_f64, 0_u32), |(total, valid), seconds| {
            (total + seconds, valid + 1)
        });

    if valid == 0 {
        return 0.0;
    }
    round2(total / f64::from(valid))
}

pub fn kpi_summary(runs: &[AgentRun]) -> KpiStats {
    let counts = RunCounts::tally(runs);
    let active_agents = runs
        .iter()
        .map(|run| run.agent_id)
        .collect::<HashSet<_>>()
        .len();

    KpiStats {
        total_runs: counts.total,
        completed: counts.completed,
        failed: counts.failed,
        avg_completion_time: average_completion_seconds(runs),
        active_agents,
    }
}

/// Detailed stats for one agent. Runs belonging to other agents are ignored,
/// so the full run set or a pre-filtered one give the same answer.
pub fn agent_summary(agent_id: i64, runs: &[AgentRun]) -> AgentStats {
    let own: Vec<&AgentRun> = runs.iter().filter(|run| run.agent_id == agent_id).collect();
    let counts = RunCounts::tally(own.iter().copied());

    AgentStats {
        agent_id,
        total_runs: counts.total,
        completed: counts.completed,
        failed: counts.failed,
        avg_completion_time: average_completion_seconds(own),
    }
}

/// Runs per agent, ascending by agent id. Absent feedback counts as `0` in
/// the mean.
pub fn agent_run_counts(runs: &[AgentRun]) -> Vec<AgentRunCount> {
    // Summed in i128 so any mix of i64 feedback values fits.
    let mut per_agent: BTreeMap<i64, (usize, i128)> = BTreeMap::new();
    for run in runs {
        let entry = per_agent.entry(run.agent_id).or_default();
        entry.0 += 1;
        entry.1 += i128::from(run.feedback.unwrap_or(0));
    }

    per_agent
        .into_iter()
        .map(|(agent_id, (run_count, feedback_sum))| {
            #[allow(clippy::cast_precision_loss)]
            let avg_feedback = round2(feedback_sum as f64 / run_count as f64);
            AgentRunCount {
                agent_id,
                run_count,
                avg_feedback,
            }
        })
        .collect()
}

/// Runs per literal status string. No case folding: `"Completed"` and
/// `"completed"` are separate groups.
pub fn status_breakdown(runs: &[AgentRun]) -> Vec<StatusCount> {
    let mut per_status: BTreeMap<&str, usize> = BTreeMap::new();
    for run in runs {
        *per_status.entry(run.status.as_str()).or_default() += 1;
    }

    per_status
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect()
}

/// Runs created per calendar date, ascending. Runs whose `created_at` does
/// not parse are skipped.
pub fn timeline(runs: &[AgentRun]) -> Vec<TimelineEntry> {
    let mut per_date = BTreeMap::new();
    for date in runs.iter().filter_map(|run| calendar_date(&run.created_at)) {
        *per_date.entry(date).or_insert(0_usize) += 1;
    }

    per_date
        .into_iter()
        .map(|(date, count)| TimelineEntry {
            date: date.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect()
}

/// Three-way feedback partition. Every run lands in exactly one bucket.
pub fn feedback_summary(runs: &[AgentRun]) -> FeedbackStats {
    runs.iter().fold(FeedbackStats::default(), |mut stats, run| {
        match run.feedback {
            Some(1) => stats.positive += 1,
            Some(-1) => stats.negative += 1,
            _ => stats.neutral += 1,
        }
        stats
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Default)]
struct RunCounts {
    total: usize,
    completed: usize,
    failed: usize,
}

impl RunCounts {
    fn tally<'a>(runs: impl IntoIterator<Item = &'a AgentRun>) -> Self {
        runs.into_iter().fold(Self::default(), |mut counts, run| {
            counts.total += 1;
            match run.status.as_str() {
                STATUS_COMPLETED => counts.completed += 1,
                STATUS_FAILED => counts.failed += 1,
                _ => {}
            }
            counts
        })
    }
}
