//! Tag frequency ranking with stable (first-seen) tie-breaking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tally_core::model::Task;

/// Maximum number of labels reported by [`top_tags`].
pub const TOP_TAGS: usize = 5;

/// Bucket for structured tags that carry no `label` field.
pub const UNKNOWN_LABEL: &str = "unknown";

/// One ranked label with its frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub label: String,
    pub count: u64,
}

/// Rank the most frequent tag labels across a user's tasks.
///
/// Only structured tag entries participate; unstructured entries (bare
/// strings and other scalars) are skipped. A structured tag without a
/// label counts under [`UNKNOWN_LABEL`]. The result is at most
/// [`TOP_TAGS`] entries, descending by count; ties keep the order in
/// which labels were first encountered across the task iteration — not
/// alphabetical order.
#[must_use]
pub fn top_tags(tasks: &[Task]) -> Vec<TagCount> {
    // Frequency plus first-seen index per label; the index is the
    // tie-break key for the final ranking.
    let mut counts: HashMap<String, (u64, usize)> = HashMap::new();

    for task in tasks {
        for entry in &task.tags {
            let Some(tag) = entry.structured() else {
                continue;
            };
            let label = tag
                .label
                .clone()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
            let first_seen = counts.len();
            let slot = counts.entry(label).or_insert((0, first_seen));
            slot.0 += 1;
        }
    }

    let mut ranked: Vec<(String, (u64, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
    ranked.truncate(TOP_TAGS);

    ranked
        .into_iter()
        .map(|(label, (count, _))| TagCount { label, count })
        .collect()
}
