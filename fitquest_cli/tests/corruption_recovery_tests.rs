//! Corruption recovery tests for the fitquest binary.
//!
//! These tests verify the system can handle:
//! - Corrupted state files
//! - Out-of-sync state snapshots
//! - Corrupted level-up logs
//! - Malformed plan files

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::io::Write as IoWrite;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("fitquest"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

const PLAN: &str = r#"{
    "id": "recovery",
    "weekly_schedule": [
        {"day": 1, "focus": "Full Body", "exercises": [
            {"name": "Squats", "type": "strength", "sets": 3},
            {"name": "Mystery drill", "type": "balance"}
        ]}
    ]
}"#;

#[test]
fn test_corrupted_state_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("state.json"), "{ invalid json }}}}")
        .expect("Failed to write corrupted state");

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("LEVEL 1"));
}

#[test]
fn test_out_of_sync_state_is_normalized() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Experience beyond the level threshold, stale threshold
    fs::write(
        data_dir.join("state.json"),
        r#"{"level": 1, "current_exp": 260, "exp_to_next_level": 100}"#,
    )
    .unwrap();

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("LEVEL 3"))
        .stdout(predicate::str::contains("10 / 225"));
}

#[test]
fn test_stray_completion_key_keeps_progress() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(
        data_dir.join("state.json"),
        r#"{"level":7,"current_exp":40,"total_exercises_completed":120,"current_week":5,"completed_exercises":{"week5-day1-exercise0":true,"week5-day1-exercise0-legacy":true}}"#,
    )
    .unwrap();

    // Starting a week writes the state back
    let plan_path = data_dir.join("incoming.json");
    fs::write(&plan_path, PLAN).unwrap();
    cli()
        .arg("plan")
        .arg(&plan_path)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 6 started"));

    let contents = fs::read_to_string(data_dir.join("state.json")).unwrap();
    let state: Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(state["level"], 7);
    assert_eq!(state["total_exercises_completed"], 120);
    assert_eq!(state["completed_exercises"]["week5-day1-exercise0"], true);

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("LEVEL 7"));
}

#[test]
fn test_level_zero_state_is_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("state.json"), r#"{"level": 0}"#).unwrap();

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure();
}

#[test]
fn test_partial_log_line_is_skipped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Simulate a crash mid-append
    fs::create_dir_all(data_dir.join("wal")).unwrap();
    let log_path = data_dir.join("wal/level_ups.wal");
    let mut file = fs::File::create(&log_path).unwrap();
    write!(file, r#"{{"id":"00000000-0000-0000-0000-0000"#).unwrap();
    drop(file);

    cli()
        .arg("rollup")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 0 level-ups"));
}

#[test]
fn test_unknown_exercise_type_earns_default() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let plan_path = data_dir.join("incoming.json");
    fs::write(&plan_path, PLAN).unwrap();

    cli()
        .arg("plan")
        .arg(&plan_path)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("complete")
        .arg("--day")
        .arg("1")
        .arg("--exercise")
        .arg("1")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("+10 XP"));

    let contents = fs::read_to_string(data_dir.join("state.json")).unwrap();
    let state: Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(state["current_exp"], 10);
}

#[test]
fn test_malformed_plan_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let plan_path = data_dir.join("incoming.json");
    fs::write(&plan_path, "{ not json").unwrap();

    cli()
        .arg("plan")
        .arg(&plan_path)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure();

    assert!(!data_dir.join("state.json").exists());
}
