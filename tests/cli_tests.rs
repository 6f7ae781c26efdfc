mod support;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

use support::config::{minimal, write_temp_config, TEMPLATE};

fn fundwatch() -> Command {
    Command::cargo_bin("fundwatch").expect("binary builds")
}

#[test]
fn help_lists_commands() {
    fundwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("predicted"));
}

#[test]
fn check_config_accepts_valid_file() {
    let path = write_temp_config(&minimal());
    let assert = fundwatch()
        .args(["--color", "never", "check", "config", "--config"])
        .arg(&path)
        .assert();
    let _ = fs::remove_file(&path);

    assert
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"))
        .stdout(predicate::str::contains("BTCUSDT"));
}

#[test]
fn check_config_returns_nonzero_on_invalid_value() {
    let toml = format!("{}\n[venues.derive]\nperiod = 60\n", minimal());
    let path = write_temp_config(&toml);
    let assert = fundwatch()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert();
    let _ = fs::remove_file(&path);

    assert
        .failure()
        .code(1)
        .stderr(predicate::str::contains("venues.derive.period"));
}

#[test]
fn scan_without_config_file_fails() {
    fundwatch()
        .args(["scan", "--config", "/nonexistent/fundwatch.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn config_init_writes_template_and_refuses_overwrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fundwatch.toml");

    fundwatch()
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&path).unwrap(), TEMPLATE);

    fundwatch()
        .args(["config", "init"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    fundwatch()
        .args(["config", "init", "--force"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn scan_with_unreachable_venues_reports_partial_json() {
    let toml = format!(
        r#"{}
[monitor]
fetch_deadline_ms = 2000

[venues.hyperliquid]
base_url = "http://127.0.0.1:9"
[venues.derive]
base_url = "http://127.0.0.1:9"
[venues.binance]
base_url = "http://127.0.0.1:9"
"#,
        minimal()
    );
    let path = write_temp_config(&toml);
    let assert = fundwatch()
        .args(["--json", "scan", "--lookback-days", "1", "--config"])
        .arg(&path)
        .assert();
    let _ = fs::remove_file(&path);

    assert
        .success()
        .stdout(predicate::str::contains("\"type\":\"scan\""))
        .stdout(predicate::str::contains("\"partial\":true"))
        .stdout(predicate::str::contains("\"status\":\"failed\""));
}
