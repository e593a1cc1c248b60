//! Daily completion timeline with gap-filling.
//!
//! Produces a continuous daily series of how many tasks reached the
//! completed status on each UTC calendar day, so a caller can render a
//! chart without client-side gap handling. Gaps are filled only within the
//! observed min/max range — not from account creation or "today" — which
//! keeps the series anchored to actual activity and bounded in length for
//! old or inactive accounts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tally_core::model::Task;

/// One day of the completion timeline. `date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Build the gap-free daily completion series for one user's tasks.
///
/// Completed tasks are bucketed by the UTC calendar date of their creation
/// timestamp. A task whose timestamp is missing or failed to parse
/// contributes to no bucket and does not abort the run. Every calendar day
/// between the earliest and latest observed date gets an entry, zero-filled
/// where nothing completed. No completions at all yields an empty series,
/// not an error.
#[must_use]
pub fn daily_completions(tasks: &[Task]) -> Vec<DailyCount> {
    let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();

    for task in tasks {
        if !task.status.is_completed() {
            continue;
        }
        let Some(created_at) = task.created_at else {
            tracing::debug!(task_id = %task.id, "completed task without usable date, skipping");
            continue;
        };
        *by_day.entry(created_at.date_naive()).or_insert(0) += 1;
    }

    if let (Some(&first), Some(&last)) = (by_day.keys().next(), by_day.keys().next_back()) {
        let mut day = first;
        while day < last {
            by_day.entry(day).or_insert(0);
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }

    by_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}
