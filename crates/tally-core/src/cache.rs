//! Time-boxed snapshot cache.
//!
//! [`SnapshotCache`] memoizes computed dashboard snapshots as opaque JSON
//! blobs keyed by a caller-supplied string, with a fixed time-to-live.
//! Entries expire purely by elapsed time; task mutations never invalidate
//! them, so readers may observe data up to one TTL window stale by design.
//!
//! The cache is stored as a single JSON file so separate invocations share
//! it. Writes are unconditional overwrites: concurrent misses may both
//! recompute and redundantly store the entry (last write wins), which is
//! harmless because recomputation is idempotent and side-effect-free.
//!
//! Callers must treat the cache as best-effort: any read or write failure
//! degrades to a miss, and the caller recomputes directly.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The fixed key shared by all dashboard callers. The cached value is
/// always the full multi-user snapshot mapping, not a per-user entry.
pub const DASHBOARD_CACHE_KEY: &str = "dashboard";

/// One cached blob plus the moment it was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    stored_at: DateTime<Utc>,
    value: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheFile {
    entries: BTreeMap<String, CacheEntry>,
}

/// File-backed TTL cache for computed snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    path: PathBuf,
    ttl: Duration,
}

impl SnapshotCache {
    /// Create a cache over the given file with a TTL in seconds.
    pub fn new(path: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            path: path.into(),
            ttl: Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
        }
    }

    /// The configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch the value stored under `key`, if it is still fresh at `now`.
    ///
    /// A missing file, unreadable file, corrupt contents, absent key, or
    /// expired entry all report a miss. Corruption is logged, never raised.
    #[must_use]
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<serde_json::Value> {
        let file = self.read_file()?;
        let entry = file.entries.get(key)?;
        if now.signed_duration_since(entry.stored_at) < self.ttl {
            tracing::debug!(key, stored_at = %entry.stored_at, "snapshot cache hit");
            Some(entry.value.clone())
        } else {
            tracing::debug!(key, stored_at = %entry.stored_at, "snapshot cache entry expired");
            None
        }
    }

    /// Store `value` under `key`, stamped with `now`. Overwrites any
    /// previous entry regardless of freshness.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file cannot be written. Callers should
    /// log and continue; a failed write only costs a later recomputation.
    pub fn set(&self, key: &str, value: serde_json::Value, now: DateTime<Utc>) -> Result<()> {
        let mut file = self.read_file().unwrap_or_default();
        file.entries.insert(
            key.to_string(),
            CacheEntry {
                stored_at: now,
                value,
            },
        );

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create cache dir {}", parent.display()))?;
        }
        let body = serde_json::to_vec(&file).context("encode snapshot cache")?;
        std::fs::write(&self.path, body)
            .with_context(|| format!("write snapshot cache {}", self.path.display()))?;
        tracing::debug!(key, path = %self.path.display(), "snapshot cache stored");
        Ok(())
    }

    fn read_file(&self) -> Option<CacheFile> {
        let raw = std::fs::read(&self.path).ok()?;
        match serde_json::from_slice(&raw) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "corrupt snapshot cache, treating as empty"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir, ttl_secs: u64) -> SnapshotCache {
        SnapshotCache::new(dir.path().join("snapshots.json"), ttl_secs)
    }

    #[test]
    fn miss_when_nothing_stored() {
        let dir = TempDir::new().unwrap();
        assert_eq!(cache_in(&dir, 60).get(DASHBOARD_CACHE_KEY, Utc::now()), None);
    }

    #[test]
    fn fresh_entry_is_returned() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir, 60);
        let now = Utc::now();

        cache.set(DASHBOARD_CACHE_KEY, json!({"alice": 1}), now).unwrap();
        assert_eq!(
            cache.get(DASHBOARD_CACHE_KEY, now + Duration::seconds(59)),
            Some(json!({"alice": 1}))
        );
    }

    #[test]
    fn entry_expires_after_ttl() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir, 60);
        let now = Utc::now();

        cache.set(DASHBOARD_CACHE_KEY, json!(1), now).unwrap();
        assert_eq!(cache.get(DASHBOARD_CACHE_KEY, now + Duration::seconds(60)), None);
    }

    #[test]
    fn last_write_wins() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir, 60);
        let now = Utc::now();

        cache.set(DASHBOARD_CACHE_KEY, json!("first"), now).unwrap();
        cache.set(DASHBOARD_CACHE_KEY, json!("second"), now).unwrap();
        assert_eq!(cache.get(DASHBOARD_CACHE_KEY, now), Some(json!("second")));
    }

    #[test]
    fn corrupt_file_reports_miss_not_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshots.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = SnapshotCache::new(&path, 60);
        let now = Utc::now();
        assert_eq!(cache.get(DASHBOARD_CACHE_KEY, now), None);
        // And a set over the corrupt file recovers it.
        cache.set(DASHBOARD_CACHE_KEY, json!(2), now).unwrap();
        assert_eq!(cache.get(DASHBOARD_CACHE_KEY, now), Some(json!(2)));
    }

    #[test]
    fn keys_are_independent() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir, 60);
        let now = Utc::now();

        cache.set("a", json!(1), now).unwrap();
        cache.set("b", json!(2), now).unwrap();
        assert_eq!(cache.get("a", now), Some(json!(1)));
        assert_eq!(cache.get("b", now), Some(json!(2)));
    }
}
