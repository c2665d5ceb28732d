//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_fastwindow"))
        .args(args)
        .env("FASTWINDOW_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_plan_list_marks_default_selection() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["plan", "list"]);
    assert_eq!(code, 0, "Plan list failed");
    let plans = parse_json(&stdout);
    let plans = plans.as_array().unwrap();
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[0]["id"], "16:8");
    assert_eq!(plans[0]["selected"], true);
    assert_eq!(plans[1]["selected"], false);
}

#[test]
fn test_plan_select_persists() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["plan", "select", "18:6"]);
    assert_eq!(code, 0, "Plan select failed");
    assert!(stdout.contains("selected 18:6"));

    let (_, stdout, _) = run_cli(dir.path(), &["plan", "show"]);
    assert_eq!(parse_json(&stdout)["window_hours"], 18);
}

#[test]
fn test_plan_select_unknown_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["plan", "select", "12:12"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown fasting plan"));
}

#[test]
fn test_fast_start_status_end() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["fast", "start"]);
    assert_eq!(code, 0, "Fast start failed");
    let started = parse_json(&stdout);
    assert_eq!(started["type"], "FastStarted");
    assert_eq!(started["window_hours"], 16);

    let (code, _, stderr) = run_cli(dir.path(), &["fast", "start"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("already in progress"));

    let (code, stdout, _) = run_cli(dir.path(), &["fast", "status"]);
    assert_eq!(code, 0, "Fast status failed");
    let snapshot = parse_json(&stdout);
    assert_eq!(snapshot["state"], "running");
    assert_eq!(snapshot["plan_id"], "16:8");

    let (code, stdout, _) = run_cli(dir.path(), &["fast", "end"]);
    assert_eq!(code, 0, "Fast end failed");
    let ended = parse_json(&stdout);
    assert_eq!(ended["type"], "FastEnded");
    assert_eq!(ended["completed"], false);

    let (_, stdout, _) = run_cli(dir.path(), &["record", "list"]);
    assert_eq!(parse_json(&stdout).as_array().unwrap().len(), 1);
}

#[test]
fn test_fast_end_without_fast_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["fast", "end"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no fast in progress"));
}

#[test]
fn test_fast_cancel_saves_nothing() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["fast", "start"]);
    let (code, stdout, _) = run_cli(dir.path(), &["fast", "cancel"]);
    assert_eq!(code, 0, "Fast cancel failed");
    assert_eq!(parse_json(&stdout)["type"], "FastCancelled");
    let (_, stdout, _) = run_cli(dir.path(), &["record", "list"]);
    assert!(parse_json(&stdout).as_array().unwrap().is_empty());
}

#[test]
fn test_record_add_show_month_delete() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, stderr) = run_cli(
        dir.path(),
        &["record", "add", "2024-02-14", "--start", "20:00", "--hours", "16.5"],
    );
    assert_eq!(code, 0, "Record add failed: {stderr}");
    assert!(stdout.contains("saved 2024-02-14"));

    let (code, stdout, _) = run_cli(dir.path(), &["record", "show", "2024-02-14"]);
    assert_eq!(code, 0);
    let record = parse_json(&stdout);
    assert_eq!(record["date"], "2024-02-14");
    assert_eq!(record["durationHours"], 16.5);

    let (code, stdout, _) = run_cli(dir.path(), &["record", "month", "2024-02"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("February 2024"));
    assert!(stdout.contains(" 14*"));
    assert!(stdout.contains("Fasts this month: 1"));

    let (code, stdout, _) = run_cli(dir.path(), &["record", "month", "2024-02", "--json"]);
    assert_eq!(code, 0);
    let month = parse_json(&stdout);
    assert_eq!(month["leading_blanks"], 4);
    assert_eq!(month["days"], 29);
    assert_eq!(month["cells"].as_array().unwrap().len(), 33);
    assert_eq!(month["summary"]["fasts"], 1);

    let (code, _, _) = run_cli(dir.path(), &["record", "delete", "2024-02-14"]);
    assert_eq!(code, 0);
    let (code, _, stderr) = run_cli(dir.path(), &["record", "show", "2024-02-14"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no record on 2024-02-14"));
}

#[test]
fn test_record_add_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(
        dir.path(),
        &["record", "add", "2024-02-14", "--start", "8pm", "--hours", "16"],
    );
    assert_ne!(code, 0);
    let (code, _, _) = run_cli(
        dir.path(),
        &["record", "add", "2024-02-14", "--start", "20:00", "--hours", "0"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_record_add_huge_hours_is_an_error_not_a_crash() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["record", "add", "2024-02-14", "--start", "20:00", "--hours", "1e12"],
    );
    assert_eq!(code, 1, "expected a clean error exit: {stderr}");
    assert!(stderr.contains("hours"));
    assert!(!stderr.contains("panicked"));
    let (_, stdout, _) = run_cli(dir.path(), &["record", "list"]);
    assert!(parse_json(&stdout).as_array().unwrap().is_empty());
}

#[test]
fn test_settings_require_confirmation() {
    let dir = TempDir::new().unwrap();
    run_cli(
        dir.path(),
        &["record", "add", "2024-02-14", "--start", "20:00", "--hours", "16"],
    );
    let (code, _, stderr) = run_cli(dir.path(), &["settings", "clear-records"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("--yes"));

    let (code, _, _) = run_cli(dir.path(), &["settings", "clear-records", "--yes"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["record", "list"]);
    assert!(parse_json(&stdout).as_array().unwrap().is_empty());
}

#[test]
fn test_settings_reset_restores_default_plan() {
    let dir = TempDir::new().unwrap();
    run_cli(dir.path(), &["plan", "select", "20:4"]);
    let (code, _, _) = run_cli(dir.path(), &["settings", "reset", "--yes"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["plan", "show"]);
    assert_eq!(parse_json(&stdout)["id"], "16:8");
}

#[test]
fn test_config_get_set_list() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.tick_secs"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "1");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "plans.default_plan", "18:6"]);
    assert_eq!(code, 0, "Config set failed");
    let (_, stdout, _) = run_cli(dir.path(), &["plan", "show"]);
    assert_eq!(parse_json(&stdout)["id"], "18:6");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "plans.default_plan", "1:23"]);
    assert_ne!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0, "Config list failed");
    assert_eq!(parse_json(&stdout)["plans"]["default_plan"], "18:6");
}

#[test]
fn test_watch_without_fast_exits() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["fast", "watch"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No fast in progress"));
}
