//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway HOME so
//! the real data directory is never touched.

use std::path::Path;
use std::process::Command;

fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "prodomo-cli", "--quiet", "--"])
        .args(args)
        .env("HOME", home)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

#[test]
fn config_get_reports_defaults() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "work_duration"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn config_set_rejects_zero_duration() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "work_duration", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("work_duration"));

    // Prior value retained.
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "work_duration"]);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn task_flow_add_list_done() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["task", "add", "Write report", "--user", "alice"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Added task 1"));

    let (_, stdout, _) = run_cli(home.path(), &["task", "list", "--user", "alice"]);
    assert!(stdout.contains("[ ] 1. Write report"));

    let (code, stdout, _) = run_cli(home.path(), &["task", "done", "1", "--user", "alice"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("completed"));

    let (_, stdout, _) = run_cli(home.path(), &["task", "list", "--user", "alice"]);
    assert!(stdout.contains("[x] 1. Write report"));
}

#[test]
fn done_on_missing_task_is_not_fatal() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["task", "done", "5", "--user", "alice"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("not found"));
}

#[test]
fn profile_for_unknown_user() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["profile", "show", "--user", "ghost"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No profile"));
}
