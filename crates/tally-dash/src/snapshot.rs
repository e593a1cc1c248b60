//! Snapshot assembly: one analytics record per roster user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tally_core::model::Task;

use crate::histogram::status_histogram;
use crate::stats::completion_stats;
use crate::tags::{TagCount, top_tags};
use crate::timeline::{DailyCount, daily_completions};

/// The computed analytics for one user at one point in time.
///
/// Snapshots are never persisted by the engine; they live only for one
/// cache TTL window. Field names are part of the output contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub status_counts: BTreeMap<String, u64>,
    pub daily_completions: Vec<DailyCount>,
    pub top_tags: Vec<TagCount>,
    pub mean_completion_days: f64,
    pub weekly_completion_rate: f64,
}

/// Aggregate one user's tasks into a [`Snapshot`] at time `now`.
///
/// Pure: reads a point-in-time view of the tasks, mutates nothing, and
/// performs no I/O. Running it twice on the same input yields an
/// identical snapshot.
#[must_use]
pub fn aggregate(tasks: &[Task], now: DateTime<Utc>) -> Snapshot {
    let stats = completion_stats(tasks, now);
    Snapshot {
        status_counts: status_histogram(tasks),
        daily_completions: daily_completions(tasks),
        top_tags: top_tags(tasks),
        mean_completion_days: stats.mean_completion_days,
        weekly_completion_rate: stats.weekly_completion_rate,
    }
}

/// Aggregate every roster user's tasks into a user → snapshot mapping.
///
/// The roster is an explicit input: users are never discovered from the
/// task data, and a roster user with no tasks still gets a full
/// (all-zero/empty) snapshot. Task sets present in `tasks_by_user` for
/// users outside the roster are ignored.
#[must_use]
pub fn aggregate_all(
    roster: &[String],
    tasks_by_user: &BTreeMap<String, Vec<Task>>,
    now: DateTime<Utc>,
) -> BTreeMap<String, Snapshot> {
    roster
        .iter()
        .map(|user| {
            let tasks = tasks_by_user.get(user).map_or(&[][..], Vec::as_slice);
            tracing::debug!(user = %user, tasks = tasks.len(), "aggregating dashboard snapshot");
            (user.clone(), aggregate(tasks, now))
        })
        .collect()
}
