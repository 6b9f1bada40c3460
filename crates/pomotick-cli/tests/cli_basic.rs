//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomotick"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run the interactive timer with `input` piped to stdin.
fn run_interactive(data_dir: &Path, input: &[u8]) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pomotick"))
        .arg("--data-dir")
        .arg(data_dir)
        .arg("run")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input)
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for CLI");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

#[test]
fn test_config_set_then_get() {
    let tmp = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(tmp.path(), &["config", "set", "workDuration", "30"]);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli(tmp.path(), &["config", "get", "workDuration"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "30");
}

#[test]
fn test_config_set_coerces_bad_number() {
    let tmp = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(tmp.path(), &["config", "set", "shortBreakDuration", "lots"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("shortBreakDuration = 5"));
}

#[test]
fn test_config_unknown_key_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(tmp.path(), &["config", "get", "theme"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_list_is_json() {
    let tmp = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(tmp.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["longBreakInterval"], 4);
    assert_eq!(json["soundEnabled"], true);
}

#[test]
fn test_history_starts_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(tmp.path(), &["history", "list", "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json, serde_json::json!([]));
}

#[test]
fn test_history_clear_resets_count() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("pomodoro_sessions.json"),
        r#"[{"mode":"work","duration":1500,"completedAt":1700000000000}]"#,
    )
    .unwrap();
    std::fs::write(tmp.path().join("pomodoro_completed.json"), "1").unwrap();

    let (stdout, _, code) = run_cli(tmp.path(), &["history", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Focus Session"));

    let (_, _, code) = run_cli(tmp.path(), &["history", "clear"]);
    assert_eq!(code, 0);
    let sessions = std::fs::read_to_string(tmp.path().join("pomodoro_sessions.json")).unwrap();
    let completed = std::fs::read_to_string(tmp.path().join("pomodoro_completed.json")).unwrap();
    assert_eq!(sessions, "[]");
    assert_eq!(completed, "0");
}

#[test]
fn test_history_list_limit_zero_is_not_empty_message() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("pomodoro_sessions.json"),
        r#"[{"mode":"work","duration":1500,"completedAt":1700000000000}]"#,
    )
    .unwrap();

    let (stdout, _, code) = run_cli(tmp.path(), &["history", "list", "--limit", "0"]);
    assert_eq!(code, 0);
    assert!(!stdout.contains("No sessions yet"));
}

#[test]
fn test_stats_today_json() {
    let tmp = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(tmp.path(), &["stats", "today", "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["pomodoros"], 0);
    assert_eq!(json["completed_count"], 0);
}

#[test]
fn test_run_accepts_commands_from_stdin() {
    let tmp = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_interactive(tmp.path(), b"start\nstart\npause\nshort\nstatus\nquit\n");
    assert_eq!(code, 0);

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .filter(|v: &serde_json::Value| v.is_object())
        .collect();
    let kinds: Vec<&str> = events.iter().filter_map(|e| e["type"].as_str()).collect();
    assert_eq!(
        kinds,
        vec!["TimerStarted", "TimerPaused", "ModeSwitched", "StateSnapshot"]
    );
    assert!(stdout.contains("05:00  Short Break  [paused]"));
}

#[test]
fn test_run_survives_invalid_utf8_line() {
    let tmp = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) =
        run_interactive(tmp.path(), b"start\n\xff\xfe\n status\nset volume 3\nquit\n");
    assert_eq!(code, 0);
    assert!(stderr.contains("skipping unreadable input line"));
    assert!(stderr.contains("command rejected"));
    assert!(stdout.contains("\"type\":\"StateSnapshot\""));
}
