//! SQLite task store: the CRUD surface behind the dashboard engine.
//!
//! Provides typed Rust structs and query functions for the task table:
//! insert, field-level patch, comment append, delete, and full/filtered
//! scans by owner.
//!
//! All functions take a shared `&Connection` reference and return
//! `anyhow::Result<T>` with typed structs (never raw rows). Reads are
//! lenient by design: a malformed `tags`/`comments` cell degrades to an
//! empty list and an unparseable `created_at` degrades to `None`, so one
//! bad row never takes down a scan.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

use crate::model::{Comment, StatusValue, TagEntry, Task};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Task table schema. `tags` and `comments` hold JSON arrays; `status` is
/// deliberately unconstrained so rows written by other tooling survive a
/// scan (the engine ignores unrecognized values instead).
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS tasks (
    task_id TEXT PRIMARY KEY,
    owner TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    comments TEXT NOT NULL DEFAULT '[]'
);

CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner);
";

/// Open (or create) the task database at `path` and ensure the schema.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the schema DDL fails.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open task db at {}", path.display()))?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .context("set journal_mode=WAL")?;
    init_store(&conn)?;
    Ok(conn)
}

/// Create the schema if it does not exist. Idempotent.
///
/// # Errors
///
/// Returns an error if the DDL fails to execute.
pub fn init_store(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL).context("create task schema")
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Fields supplied by the caller when creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<TagEntry>,
}

/// Field-level patch for an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<StatusValue>,
    pub tags: Option<Vec<TagEntry>>,
}

impl TaskPatch {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.tags.is_none()
    }
}

/// Error returned when an operation references a task id that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("task not found: {id}")]
pub struct TaskNotFound {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Id generation
// ---------------------------------------------------------------------------

const ID_PREFIX: &str = "tk-";
const ID_SUFFIX_LEN: usize = 8;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh task id: `tk-` plus 8 random base36 characters.
#[must_use]
pub fn new_task_id() -> String {
    let mut rng = rand::thread_rng();
    let mut id = String::with_capacity(ID_PREFIX.len() + ID_SUFFIX_LEN);
    id.push_str(ID_PREFIX);
    for _ in 0..ID_SUFFIX_LEN {
        let i = rng.gen_range(0..ID_ALPHABET.len());
        id.push(ID_ALPHABET[i] as char);
    }
    id
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Insert a new task and return the stored record.
///
/// The store assigns the id, stamps `created_at` with `now`, starts the
/// status at `pending`, and starts the comment list empty.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_task(conn: &Connection, new: &NewTask, now: DateTime<Utc>) -> Result<Task> {
    let task = Task {
        id: new_task_id(),
        owner: new.owner.clone(),
        title: new.title.clone(),
        description: new.description.clone(),
        status: StatusValue::parse("pending"),
        created_at: Some(now),
        tags: new.tags.clone(),
        comments: Vec::new(),
    };

    conn.execute(
        "INSERT INTO tasks (task_id, owner, title, description, status, created_at, tags, comments)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            task.id,
            task.owner,
            task.title,
            task.description,
            task.status.as_str(),
            now.to_rfc3339(),
            serde_json::to_string(&task.tags)?,
            "[]",
        ],
    )
    .with_context(|| format!("insert task {}", task.id))?;

    tracing::debug!(task_id = %task.id, owner = %task.owner, "task created");
    Ok(task)
}

/// Apply a field-level patch to a task and return the updated record.
///
/// # Errors
///
/// Returns [`TaskNotFound`] when the id does not exist, or an error if the
/// write fails.
pub fn update_task(conn: &Connection, id: &str, patch: &TaskPatch) -> Result<Task> {
    let mut task = get_task(conn, id)?.ok_or_else(|| TaskNotFound { id: id.to_string() })?;

    if let Some(title) = &patch.title {
        task.title = title.clone();
    }
    if let Some(description) = &patch.description {
        task.description = description.clone();
    }
    if let Some(status) = &patch.status {
        task.status = status.clone();
    }
    if let Some(tags) = &patch.tags {
        task.tags = tags.clone();
    }

    conn.execute(
        "UPDATE tasks SET title = ?2, description = ?3, status = ?4, tags = ?5
         WHERE task_id = ?1",
        params![
            task.id,
            task.title,
            task.description,
            task.status.as_str(),
            serde_json::to_string(&task.tags)?,
        ],
    )
    .with_context(|| format!("update task {id}"))?;

    tracing::debug!(task_id = %task.id, "task updated");
    Ok(task)
}

/// Append a `{text, now}` comment to a task's comment list.
///
/// # Errors
///
/// Returns [`TaskNotFound`] when the id does not exist, or an error if the
/// write fails.
pub fn append_comment(
    conn: &Connection,
    id: &str,
    text: &str,
    now: DateTime<Utc>,
) -> Result<Comment> {
    let task = get_task(conn, id)?.ok_or_else(|| TaskNotFound { id: id.to_string() })?;

    let comment = Comment {
        text: text.to_string(),
        date: now,
    };
    let mut comments = task.comments;
    comments.push(comment.clone());

    conn.execute(
        "UPDATE tasks SET comments = ?2 WHERE task_id = ?1",
        params![id, serde_json::to_string(&comments)?],
    )
    .with_context(|| format!("append comment to task {id}"))?;

    tracing::debug!(task_id = %id, "comment appended");
    Ok(comment)
}

/// Delete a task by id. Deleting an id that does not exist is not an error.
///
/// # Errors
///
/// Returns an error if the delete statement fails.
pub fn delete_task(conn: &Connection, id: &str) -> Result<()> {
    let n = conn
        .execute("DELETE FROM tasks WHERE task_id = ?1", params![id])
        .with_context(|| format!("delete task {id}"))?;
    tracing::debug!(task_id = %id, deleted = n, "task delete");
    Ok(())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

const TASK_COLUMNS: &str =
    "task_id, owner, title, description, status, created_at, tags, comments";

/// Fetch a single task by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_task(conn: &Connection, id: &str) -> Result<Option<Task>> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = ?1"),
        params![id],
        row_to_task,
    )
    .optional()
    .with_context(|| format!("get task {id}"))
}

/// All tasks belonging to one owner. An empty result is not an error.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn tasks_for_owner(conn: &Connection, owner: &str) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE owner = ?1 ORDER BY created_at, task_id"
    ))?;
    let rows = stmt
        .query_map(params![owner], row_to_task)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("scan tasks for owner {owner}"))?;
    Ok(rows)
}

/// Unfiltered scan of every task.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_tasks(conn: &Connection) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at, task_id"
    ))?;
    let rows = stmt
        .query_map([], row_to_task)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("scan all tasks")?;
    Ok(rows)
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let id: String = row.get(0)?;
    let status_raw: String = row.get(4)?;
    let created_raw: Option<String> = row.get(5)?;
    let tags_raw: String = row.get(6)?;
    let comments_raw: String = row.get(7)?;

    let created_at = created_raw.as_deref().and_then(|raw| {
        DateTime::parse_from_rfc3339(raw).map_or_else(
            |e| {
                tracing::warn!(task_id = %id, error = %e, "unparseable created_at, treating as absent");
                None
            },
            |ts| Some(ts.with_timezone(&Utc)),
        )
    });

    let tags: Vec<TagEntry> = serde_json::from_str(&tags_raw).unwrap_or_else(|e| {
        tracing::warn!(task_id = %id, error = %e, "malformed tags cell, defaulting to empty");
        Vec::new()
    });
    let comments: Vec<Comment> = serde_json::from_str(&comments_raw).unwrap_or_else(|e| {
        tracing::warn!(task_id = %id, error = %e, "malformed comments cell, defaulting to empty");
        Vec::new()
    });

    Ok(Task {
        id,
        owner: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: StatusValue::parse(&status_raw),
        created_at,
        tags,
        comments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Status, Tag};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_store(&conn).unwrap();
        conn
    }

    fn new_task(owner: &str, title: &str) -> NewTask {
        NewTask {
            owner: owner.to_string(),
            title: title.to_string(),
            description: String::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn insert_assigns_id_and_defaults() {
        let conn = test_conn();
        let now = Utc::now();
        let task = insert_task(&conn, &new_task("alice", "Write report"), now).unwrap();

        assert!(task.id.starts_with("tk-"));
        assert_eq!(task.status.known(), Some(Status::Pending));
        assert!(task.comments.is_empty());

        let fetched = get_task(&conn, &task.id).unwrap().expect("task exists");
        assert_eq!(fetched.title, "Write report");
        assert_eq!(fetched.owner, "alice");
        assert!(fetched.created_at.is_some());
    }

    #[test]
    fn owner_scan_filters_and_tolerates_empty() {
        let conn = test_conn();
        let now = Utc::now();
        insert_task(&conn, &new_task("alice", "a1"), now).unwrap();
        insert_task(&conn, &new_task("alice", "a2"), now).unwrap();
        insert_task(&conn, &new_task("bob", "b1"), now).unwrap();

        assert_eq!(tasks_for_owner(&conn, "alice").unwrap().len(), 2);
        assert_eq!(tasks_for_owner(&conn, "bob").unwrap().len(), 1);
        assert!(tasks_for_owner(&conn, "nobody").unwrap().is_empty());
        assert_eq!(list_tasks(&conn).unwrap().len(), 3);
    }

    #[test]
    fn patch_updates_only_given_fields() {
        let conn = test_conn();
        let task = insert_task(&conn, &new_task("alice", "before"), Utc::now()).unwrap();

        let patch = TaskPatch {
            status: Some(StatusValue::Known(Status::Completed)),
            tags: Some(vec![TagEntry::Structured(Tag::labeled("urgent"))]),
            ..TaskPatch::default()
        };
        let updated = update_task(&conn, &task.id, &patch).unwrap();

        assert_eq!(updated.title, "before");
        assert!(updated.status.is_completed());
        assert_eq!(updated.tags.len(), 1);
    }

    #[test]
    fn update_missing_task_is_not_found() {
        let conn = test_conn();
        let err = update_task(&conn, "tk-missing", &TaskPatch::default()).unwrap_err();
        assert!(err.downcast_ref::<TaskNotFound>().is_some());
    }

    #[test]
    fn comments_append_in_order() {
        let conn = test_conn();
        let task = insert_task(&conn, &new_task("alice", "t"), Utc::now()).unwrap();

        append_comment(&conn, &task.id, "first", Utc::now()).unwrap();
        append_comment(&conn, &task.id, "second", Utc::now()).unwrap();

        let fetched = get_task(&conn, &task.id).unwrap().expect("task exists");
        let texts: Vec<_> = fetched.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[test]
    fn delete_is_blind() {
        let conn = test_conn();
        let task = insert_task(&conn, &new_task("alice", "t"), Utc::now()).unwrap();

        delete_task(&conn, &task.id).unwrap();
        assert!(get_task(&conn, &task.id).unwrap().is_none());
        // Deleting again is fine.
        delete_task(&conn, &task.id).unwrap();
    }

    #[test]
    fn reads_are_lenient_about_bad_cells() {
        let conn = test_conn();
        conn.execute(
            "INSERT INTO tasks (task_id, owner, title, status, created_at, tags, comments)
             VALUES ('tk-bad', 'alice', 'legacy row', 'concluída', 'not-a-date', '{oops', 'nope')",
            [],
        )
        .unwrap();

        let task = get_task(&conn, "tk-bad").unwrap().expect("row survives");
        assert_eq!(task.status.known(), None);
        assert_eq!(task.status.as_str(), "concluída");
        assert_eq!(task.created_at, None);
        assert!(task.tags.is_empty());
        assert!(task.comments.is_empty());
    }

    #[test]
    fn task_ids_look_unique_enough() {
        let ids: std::collections::HashSet<_> = (0..64).map(|_| new_task_id()).collect();
        assert_eq!(ids.len(), 64);
        assert!(ids.iter().all(|id| id.len() == 11));
    }
}
