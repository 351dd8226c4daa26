//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomotrack"))
        .env("POMOTRACK_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

fn add_habit(data_dir: &Path, name: &str) -> String {
    let habit = run_json(data_dir, &["habit", "add", name, "--json"]);
    habit["id"].as_str().unwrap().to_string()
}

#[test]
fn test_habit_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    add_habit(dir.path(), "Read");
    add_habit(dir.path(), "Stretch");

    let list = run_json(dir.path(), &["habit", "list", "--json"]);
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Read", "Stretch"]);
    assert!(dir.path().join("habits.json").exists());
}

#[test]
fn test_habit_toggle_streaks() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Journal");

    for date in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        let (code, stdout, stderr) = run_cli(
            dir.path(),
            &["habit", "toggle", &id, "--date", date, "--as-of", "2024-01-03"],
        );
        assert_eq!(code, 0, "toggle failed: {stderr}");
        assert!(stdout.starts_with("Completed"));
    }

    let habit = run_json(dir.path(), &["habit", "show", &id, "--as-of", "2024-01-03"]);
    assert_eq!(habit["currentStreak"], 3);
    assert_eq!(habit["longestStreak"], 3);

    let habit = run_json(dir.path(), &["habit", "show", &id[..8], "--as-of", "2024-01-10"]);
    assert_eq!(habit["currentStreak"], 0);
    assert_eq!(habit["longestStreak"], 3);

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["habit", "toggle", &id, "--date", "2024-01-02", "--as-of", "2024-01-03"],
    );
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Cleared"));
    assert!(stdout.contains("current 1, longest 1"));
}

#[test]
fn test_habit_toggle_rejects_bad_date() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_habit(dir.path(), "Walk");
    let (code, _, stderr) = run_cli(dir.path(), &["habit", "toggle", &id, "--date", "2024-1-5"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("YYYY-MM-DD"));
}

#[test]
fn test_habit_remove_unknown_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["habit", "remove", "nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_corrupt_snapshot_warns_and_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("habits.json"), "garbage").unwrap();
    let (code, stdout, stderr) = run_cli(dir.path(), &["habit", "list", "--json"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("warning"));
    assert_eq!(stdout.trim(), "[]");
}

#[test]
fn test_timer_simulate_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(
        dir.path(),
        &["timer", "simulate", "--transitions", "8", "--tick", "60"],
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 9);
    let to: Vec<_> = events[..8].iter().map(|e| e["to"].as_str().unwrap()).collect();
    assert_eq!(
        to,
        vec![
            "short_break",
            "work",
            "short_break",
            "work",
            "short_break",
            "work",
            "long_break",
            "work"
        ]
    );
    assert_eq!(events[6]["completedWorkIntervals"], 4);
    assert_eq!(events[8]["completedWorkIntervals"], 4);
}

#[test]
fn test_timer_simulate_handoff() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["timer", "simulate", "--remaining", "1", "--total", "1500", "--transitions", "1", "--tick", "1"],
    );
    assert_eq!(code, 0);
    let first: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(first["type"], "phase_changed");
    assert_eq!(first["to"], "short_break");
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "schedule.pomodoros_before_long_break"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "4");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "schedule.pomodoros_before_long_break", "2"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "schedule.pomodoros_before_long_break"]);
    assert_eq!(stdout.trim(), "2");

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "schedule.pomodoros_before_long_break", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("at least 1"));
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "schedule.pomodoros_before_long_break"]);
    assert_eq!(stdout.trim(), "2");

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["longBreakInterval"], 2);
    assert_eq!(status["phase"], "work");
}

#[test]
fn test_timer_simulate_without_auto_advance() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "auto_advance", "false"]);
    assert_eq!(code, 0);

    let mut child = Command::new(env!("CARGO_BIN_EXE_pomotrack"))
        .env("POMOTRACK_DATA_DIR", dir.path())
        .env_remove("RUST_LOG")
        .args(["timer", "simulate", "--transitions", "2", "--tick", "60"])
        .stdout(std::process::Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    while child.try_wait().unwrap().is_none() {
        if std::time::Instant::now() > deadline {
            child.kill().unwrap();
            panic!("simulate did not finish with auto_advance off");
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["to"], "short_break");
    assert_eq!(events[1]["to"], "work");
}

#[test]
fn test_config_get_json() {
    let dir = tempfile::tempdir().unwrap();
    let value = run_json(dir.path(), &["config", "get", "auto_advance", "--json"]);
    assert_eq!(value["key"], "auto_advance");
    assert_eq!(value["value"], true);

    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "schedule"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}
