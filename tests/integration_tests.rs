use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cmd() -> Command {
    cargo_bin_cmd!("tuicast")
}

#[test]
fn test_cli_replays_scroll_as_yaml() {
    cmd()
        .args(["--step", "scroll:100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("initial:"))
        .stdout(predicate::str::contains("event: system.window.scroll"))
        .stdout(predicate::str::contains("- header"))
        .stdout(predicate::str::contains("- progress"))
        .stdout(predicate::str::contains("final:"));
}

#[test]
fn test_cli_without_steps_prints_empty_trace() {
    cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("entries: []"));
}

#[test]
fn test_cli_json_output() {
    let output = cmd()
        .args(["--step", "resize:120x40", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let trace: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let entry = &trace["entries"][0];
    assert_eq!(entry["event"], "system.window.resize");
    assert_eq!(entry["native"]["type"], "resize");
    assert_eq!(entry["delivered"], serde_json::json!(["sidebar", "popup"]));
    assert_eq!(trace["final"]["width"], 120);
}

#[test]
fn test_cli_steps_run_in_order() {
    let output = cmd()
        .args([
            "--format", "json", "-s", "scroll:50", "-s", "dismiss", "-s", "scroll:50",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let trace: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let entries = trace["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["fired"], true);
    assert_eq!(entries[1]["delivered"], serde_json::json!(["popup"]));
    assert_eq!(entries[2]["fired"], false);
    assert_eq!(entries[2]["delivered"], serde_json::json!([]));
}

#[test]
fn test_cli_scroll_is_clamped_to_content() {
    let output = cmd()
        .args([
            "--format",
            "json",
            "--content-height",
            "50",
            "--height",
            "20",
            "--step",
            "scroll:1000",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let trace: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(trace["final"]["scroll_y"], 30);
    assert_eq!(trace["entries"][0]["native"]["y"], 30);
}

#[test]
fn test_cli_invalid_step_fails() {
    cmd()
        .args(["--step", "jump:3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown step"));
}

#[test]
fn test_cli_zero_width_fails() {
    cmd()
        .args(["--width", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("window size must be non-zero"));
}

#[test]
fn test_cli_missing_config_fails() {
    cmd()
        .args(["--config", "/nonexistent/tuicast.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_cli_reads_steps_from_config() {
    let dir = std::env::temp_dir();
    let config_path = dir.join(format!("tuicast-cli-{}.toml", std::process::id()));
    std::fs::write(
        &config_path,
        "[window]\ncontent_height = 400\n\n[[replay.steps]]\nkind = \"scroll\"\ny = 300\n",
    )
    .unwrap();

    let assert = cmd()
        .args(["--format", "json", "--config"])
        .arg(&config_path)
        .assert();
    std::fs::remove_file(&config_path).unwrap();

    let output = assert.success().get_output().stdout.clone();
    let trace: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(trace["initial"]["content_height"], 400);
    assert_eq!(trace["entries"][0]["native"]["y"], 300);
}

#[test]
fn test_cli_writes_output_file() {
    let dir = std::env::temp_dir();
    let out_path = dir.join(format!("tuicast-trace-{}.yaml", std::process::id()));

    cmd()
        .args(["--step", "dismiss", "--output"])
        .arg(&out_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote trace to"));

    let written = std::fs::read_to_string(&out_path).unwrap();
    std::fs::remove_file(&out_path).unwrap();
    assert!(written.contains("event: system.dismiss.popups"));
    assert!(written.contains("- popup"));
}

#[test]
fn test_cli_save_config() {
    let dir = std::env::temp_dir();
    let config_path = dir.join(format!("tuicast-saved-{}.toml", std::process::id()));

    cmd()
        .args(["--width", "100", "--step", "scroll:5", "--save-config"])
        .arg(&config_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved config to"));

    let saved = std::fs::read_to_string(&config_path).unwrap();
    std::fs::remove_file(&config_path).unwrap();
    assert!(saved.contains("width = 100"));
    assert!(saved.contains("kind = \"scroll\""));
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tuicast"));
}
