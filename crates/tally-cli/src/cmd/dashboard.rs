//! `tly dashboard` — per-user analytics snapshots, behind the TTL cache.
//!
//! Control flow: consult the snapshot cache first; on a miss, fetch every
//! roster user's task set from the store, run the aggregation engine once
//! per user, store the resulting mapping back in the cache, and print it.
//! Cache failures are never fatal — the dashboard always falls back to
//! direct recomputation.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use tally_core::cache::{DASHBOARD_CACHE_KEY, SnapshotCache};
use tally_core::{load_config, store};
use tally_dash::aggregate_all;

use crate::output::{OutputMode, pretty_kv, pretty_section, render};
use crate::project::{cache_path, open_store};

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Skip the cache read and recompute (the result is still stored).
    #[arg(long)]
    pub refresh: bool,
}

pub fn run_dashboard(args: &DashboardArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let config = load_config(project_root)?;
    let cache = SnapshotCache::new(cache_path(project_root), config.dashboard.cache_ttl_secs);
    let now = Utc::now();

    if !args.refresh {
        if let Some(cached) = cache.get(DASHBOARD_CACHE_KEY, now) {
            tracing::info!("serving cached dashboard");
            return render(output, &cached, render_human);
        }
    }

    let conn = open_store(project_root)?;
    let roster = &config.dashboard.users;
    let mut tasks_by_user = BTreeMap::new();
    for user in roster {
        tasks_by_user.insert(user.clone(), store::tasks_for_owner(&conn, user)?);
    }

    let snapshots = aggregate_all(roster, &tasks_by_user, now);
    let value = serde_json::to_value(&snapshots).context("encode dashboard snapshots")?;

    if let Err(e) = cache.set(DASHBOARD_CACHE_KEY, value.clone(), now) {
        // A failed write only costs the next caller a recomputation.
        tracing::warn!(error = %e, "snapshot cache write failed, serving uncached result");
    }

    render(output, &value, render_human)
}

/// Human rendering over the serialized snapshot mapping. Operating on the
/// JSON value keeps the cached and freshly-computed paths identical.
fn render_human(value: &serde_json::Value, w: &mut dyn Write) -> std::io::Result<()> {
    let Some(users) = value.as_object() else {
        return writeln!(w, "{value}");
    };
    if users.is_empty() {
        return writeln!(w, "No users on the dashboard roster. Add some to .tally/config.toml.");
    }

    for (user, snapshot) in users {
        pretty_section(w, user)?;

        if let Some(counts) = snapshot.get("statusCounts").and_then(|v| v.as_object()) {
            let line = counts
                .iter()
                .map(|(label, n)| format!("{label}={n}"))
                .collect::<Vec<_>>()
                .join("  ");
            pretty_kv(w, "status", line)?;
        }
        if let Some(mean) = snapshot.get("meanCompletionDays") {
            pretty_kv(w, "mean days", mean.to_string())?;
        }
        if let Some(rate) = snapshot.get("weeklyCompletionRate") {
            pretty_kv(w, "weekly rate", rate.to_string())?;
        }
        if let Some(tags) = snapshot.get("topTags").and_then(|v| v.as_array()) {
            let line = tags
                .iter()
                .filter_map(|t| {
                    Some(format!(
                        "{} ({})",
                        t.get("label")?.as_str()?,
                        t.get("count")?
                    ))
                })
                .collect::<Vec<_>>()
                .join(", ");
            pretty_kv(w, "top tags", if line.is_empty() { "-".to_string() } else { line })?;
        }
        if let Some(days) = snapshot.get("dailyCompletions").and_then(|v| v.as_array()) {
            pretty_kv(w, "timeline", format!("{} day(s)", days.len()))?;
        }
        writeln!(w)?;
    }
    Ok(())
}
