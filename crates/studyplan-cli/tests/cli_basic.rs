//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a temporary config file and input.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return output.
fn run_cli(config: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_studyplan-cli"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

const INPUT: &str = r#"{
    "classes": [
        {"date": "2026-10-19", "startTime": "10:00", "endTime": "12:00", "subject": "math"}
    ],
    "weeklyClasses": [
        {"weekday": 1, "startTime": "08:00", "endTime": "20:00", "subject": "physics"}
    ],
    "tasks": [
        {"id": "t1", "title": "Proofs", "estimatedTime": 60, "priority": "High"},
        {"id": "t2", "title": "Reading", "estimatedTime": 45},
        {"id": "t3", "title": "Done already", "estimatedTime": 30, "completed": true}
    ]
}"#;

#[test]
fn test_plan_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let input = dir.path().join("input.json");
    std::fs::write(&input, INPUT).unwrap();

    let (code, stdout, _) = run_cli(
        &config,
        &["plan", "--input", input.to_str().unwrap(), "--now", "2026-10-19T05:00", "--days", "2", "--json"],
    );

    assert_eq!(code, 0, "plan failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["success"], true);
    let suggestions = parsed["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0]["taskId"], "t1");
    assert_eq!(suggestions[0]["startTime"], "2026-10-19T06:00:00");
    assert!(parsed["unscheduledTasks"].as_array().unwrap().is_empty());
}

#[test]
fn test_plan_text_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let input = dir.path().join("input.json");
    std::fs::write(&input, INPUT).unwrap();

    let (code, stdout, _) = run_cli(
        &config,
        &["plan", "--input", input.to_str().unwrap(), "--now", "2026-10-19T05:00", "--days", "1"],
    );

    assert_eq!(code, 0, "plan failed");
    assert!(stdout.contains("Mon 2026-10-19"));
    assert!(stdout.contains("06:00-07:00  Proofs"));
}

#[test]
fn test_plan_rejects_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (code, _, stderr) = run_cli(&config, &["plan", "--input", "does-not-exist.json"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let (code, stdout, _) = run_cli(&config, &["config", "set", "scheduler.days_to_schedule", "3"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (code, stdout, _) = run_cli(&config, &["config", "get", "scheduler.days_to_schedule"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");

    let (code, _, _) = run_cli(&config, &["config", "set", "scheduler.unknown", "3"]);
    assert_eq!(code, 1);
}
