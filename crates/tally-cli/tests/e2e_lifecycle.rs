//! E2E tests for the CRUD surface: `tly init`, `add`, `list`, `update`,
//! `comment`, `delete`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

fn tly_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tly"));
    cmd.current_dir(dir);
    cmd.env("TALLY_LOG", "error");
    cmd
}

fn init_project(dir: &Path) {
    tly_cmd(dir).args(["init"]).assert().success();
}

fn create_task(dir: &Path, owner: &str, title: &str) -> String {
    let output = tly_cmd(dir)
        .args(["add", "--title", title, "--owner", owner, "--json"])
        .output()
        .expect("add should not crash");
    assert!(
        output.status.success(),
        "add failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON from add");
    json["id"].as_str().expect("id must exist").to_string()
}

fn list_json(dir: &Path, extra: &[&str]) -> Vec<Value> {
    let mut args = vec!["list", "--json"];
    args.extend_from_slice(extra);
    let output = tly_cmd(dir).args(&args).output().expect("list should not crash");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("list --json must produce a JSON array")
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_project_scaffolding() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    assert!(dir.path().join(".tally/config.toml").is_file());
    assert!(dir.path().join(".tally/tasks.db").is_file());

    // Re-running init is harmless.
    tly_cmd(dir.path()).args(["init"]).assert().success();
}

#[test]
fn commands_outside_a_project_fail_cleanly() {
    let dir = TempDir::new().unwrap();
    tly_cmd(dir.path())
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a tally project"));
}

// ---------------------------------------------------------------------------
// add / list
// ---------------------------------------------------------------------------

#[test]
fn add_assigns_ids_and_defaults_to_pending() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    let id = create_task(dir.path(), "alice", "Write the report");
    assert!(id.starts_with("tk-"));

    let tasks = list_json(dir.path(), &[]);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["status"], "pending");
    assert_eq!(tasks[0]["owner"], "alice");
    assert!(tasks[0]["created_at"].is_string());
}

#[test]
fn list_filters_by_owner_and_status() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    let a1 = create_task(dir.path(), "alice", "a1");
    create_task(dir.path(), "alice", "a2");
    create_task(dir.path(), "bob", "b1");

    tly_cmd(dir.path())
        .args(["update", &a1, "--status", "completed"])
        .assert()
        .success();

    assert_eq!(list_json(dir.path(), &["--owner", "alice"]).len(), 2);
    assert_eq!(list_json(dir.path(), &["--owner", "bob"]).len(), 1);
    assert_eq!(list_json(dir.path(), &["--status", "completed"]).len(), 1);
    assert_eq!(
        list_json(dir.path(), &["--owner", "alice", "--status", "pending"]).len(),
        1
    );
}

// ---------------------------------------------------------------------------
// update
// ---------------------------------------------------------------------------

#[test]
fn update_patches_only_named_fields() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    let id = create_task(dir.path(), "alice", "before");

    tly_cmd(dir.path())
        .args(["update", &id, "--status", "in_progress"])
        .assert()
        .success();

    let tasks = list_json(dir.path(), &[]);
    assert_eq!(tasks[0]["status"], "in_progress");
    assert_eq!(tasks[0]["title"], "before");
}

#[test]
fn update_unknown_id_reports_task_not_found() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());

    tly_cmd(dir.path())
        .args(["update", "tk-missing0", "--status", "completed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task not found"));
}

#[test]
fn update_rejects_unknown_status_values() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    let id = create_task(dir.path(), "alice", "t");

    tly_cmd(dir.path())
        .args(["update", &id, "--status", "concluída"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid status"));
}

#[test]
fn update_with_no_fields_is_an_error() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    let id = create_task(dir.path(), "alice", "t");

    tly_cmd(dir.path())
        .args(["update", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to update"));
}

// ---------------------------------------------------------------------------
// comment
// ---------------------------------------------------------------------------

#[test]
fn comments_append_in_order_with_dates() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    let id = create_task(dir.path(), "alice", "t");

    tly_cmd(dir.path())
        .args(["comment", &id, "first note"])
        .assert()
        .success();
    tly_cmd(dir.path())
        .args(["comment", &id, "second note"])
        .assert()
        .success();

    let tasks = list_json(dir.path(), &[]);
    let comments = tasks[0]["comments"].as_array().expect("comments array");
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["text"], "first note");
    assert_eq!(comments[1]["text"], "second note");
    assert!(comments[0]["date"].is_string());
}

#[test]
fn empty_comments_are_rejected() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    let id = create_task(dir.path(), "alice", "t");

    tly_cmd(dir.path())
        .args(["comment", &id, "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_the_task_and_is_blind_to_repeats() {
    let dir = TempDir::new().unwrap();
    init_project(dir.path());
    let id = create_task(dir.path(), "alice", "t");

    tly_cmd(dir.path()).args(["delete", &id]).assert().success();
    assert!(list_json(dir.path(), &[]).is_empty());

    // Deleting an id that no longer exists is not an error.
    tly_cmd(dir.path()).args(["delete", &id]).assert().success();
}
