//! Project directory discovery and store access.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use tally_core::store;

/// Name of the per-project data directory.
pub const TALLY_DIR: &str = ".tally";

/// Error for commands that need a project but none was found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a tally project (no .tally directory found)")]
pub struct NotInitialized;

/// Walk up from `start` looking for a `.tally` directory.
#[must_use]
pub fn find_tally_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(TALLY_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Resolve the project root (the directory containing `.tally`).
///
/// # Errors
///
/// Fails when no `.tally` directory exists anywhere above `start`.
pub fn require_project_root(start: &Path) -> Result<PathBuf> {
    match find_tally_dir(start) {
        Some(dir) => Ok(dir
            .parent()
            .map_or_else(|| PathBuf::from("/"), Path::to_path_buf)),
        None => Err(anyhow::Error::new(NotInitialized)),
    }
}

/// Path to the task database inside a project root.
#[must_use]
pub fn db_path(project_root: &Path) -> PathBuf {
    project_root.join(TALLY_DIR).join("tasks.db")
}

/// Path to the snapshot cache file inside a project root.
#[must_use]
pub fn cache_path(project_root: &Path) -> PathBuf {
    project_root.join(TALLY_DIR).join("cache/snapshots.json")
}

/// Open the project's task database, creating the schema if needed.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn open_store(project_root: &Path) -> Result<Connection> {
    store::open(&db_path(project_root)).context("open project task store")
}
