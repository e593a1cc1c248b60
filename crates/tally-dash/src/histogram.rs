//! Status histogram: task counts per recognized lifecycle status.

use std::collections::BTreeMap;

use tally_core::model::{Status, Task};

/// Count tasks per recognized status.
///
/// The result always has exactly one entry per recognized status — absent
/// buckets report 0, never get omitted — so the output shape is fixed
/// regardless of input. Tasks whose status is outside the recognized
/// vocabulary contribute to no bucket. Bucket labels equal the status
/// vocabulary exactly (`pending`, `in_progress`, `completed`).
#[must_use]
pub fn status_histogram(tasks: &[Task]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = Status::ALL
        .iter()
        .map(|status| (status.as_str().to_string(), 0))
        .collect();

    for task in tasks {
        if let Some(status) = task.status.known() {
            if let Some(bucket) = counts.get_mut(status.as_str()) {
                *bucket += 1;
            }
        }
    }

    counts
}
