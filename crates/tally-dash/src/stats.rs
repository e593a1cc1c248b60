//! Completion latency and weekly completion rate.
//!
//! Both metrics measure "days since creation" for completed tasks. The data
//! model tracks no distinct completion timestamp, so task age stands in for
//! time-to-completion. That proxy is the contract: callers compare these
//! numbers across users and over time, and changing the reference point
//! would silently shift every historical comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tally_core::model::Task;

/// Latency and rate metrics over one user's completed tasks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    /// Mean days since creation across completed tasks, one decimal place.
    /// 0.0 when no completed tasks exist.
    pub mean_completion_days: f64,
    /// Completed tasks no older than 7 days, divided by 7, one decimal
    /// place. A rate per day of the week window — not a percentage.
    /// 0.0 when no completed tasks exist.
    pub weekly_completion_rate: f64,
}

impl CompletionStats {
    pub const ZERO: Self = Self {
        mean_completion_days: 0.0,
        weekly_completion_rate: 0.0,
    };
}

/// Compute completion stats for one user's tasks at time `now`.
///
/// Only completed tasks with a usable creation timestamp participate; a
/// task with a missing or unparseable date is excluded from both metrics
/// without affecting the rest.
#[must_use]
pub fn completion_stats(tasks: &[Task], now: DateTime<Utc>) -> CompletionStats {
    let day_deltas: Vec<i64> = tasks
        .iter()
        .filter(|task| task.status.is_completed())
        .filter_map(|task| task.created_at)
        .map(|created_at| now.signed_duration_since(created_at).num_days())
        .collect();

    if day_deltas.is_empty() {
        return CompletionStats::ZERO;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = day_deltas.iter().sum::<i64>() as f64 / day_deltas.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let within_week = day_deltas.iter().filter(|&&days| days <= 7).count() as f64;

    CompletionStats {
        mean_completion_days: round_to_tenth(mean),
        weekly_completion_rate: round_to_tenth(within_week / 7.0),
    }
}

/// Round to one decimal place.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
