//! Integration tests for stickctl

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn stickctl() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("stickctl")?)
}

fn write_file(
    dir: &TempDir,
    name: &str,
    contents: &str,
) -> Result<std::path::PathBuf, std::io::Error> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

fn pure_easing_config(dir: &TempDir) -> Result<std::path::PathBuf, std::io::Error> {
    write_file(
        dir,
        "pure.json",
        r#"{
  "jitter": false,
  "detectors": { "sdi": false, "pivot": false, "crouch_jump": false }
}"#,
    )
}

#[test]
fn test_defaults_prints_json_config() -> TestResult {
    let output = stickctl()?.arg("defaults").output()?;
    assert!(output.status.success());
    let config: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(config["jitter"], Value::Bool(true));
    assert_eq!(config["wank_rule"], Value::from("simplified"));
    assert_eq!(config["timing"]["jump_hold_us"], Value::from(33333));
    Ok(())
}

#[test]
fn test_defaults_pure_easing() -> TestResult {
    let output = stickctl()?.args(["defaults", "--pure-easing"]).output()?;
    assert!(output.status.success());
    let config: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(config["jitter"], Value::Bool(false));
    assert_eq!(config["detectors"]["sdi"], Value::Bool(false));
    Ok(())
}

#[test]
fn test_check_config_accepts_valid_file() -> TestResult {
    let dir = TempDir::new()?;
    let path = pure_easing_config(&dir)?;
    stickctl()?
        .arg("check-config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("pure.json"));
    Ok(())
}

#[test]
fn test_check_config_json_output() -> TestResult {
    let dir = TempDir::new()?;
    let path = pure_easing_config(&dir)?;
    let output = stickctl()?
        .args(["--json", "check-config"])
        .arg(&path)
        .output()?;
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["success"], Value::Bool(true));
    Ok(())
}

#[test]
fn test_check_config_rejects_inverted_range() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_file(
        &dir,
        "bad.json",
        r#"{ "timing": { "tap_inner_us": 90000 } }"#,
    )?;
    stickctl()?
        .arg("check-config")
        .arg(&path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("tap_inner_us"));
    Ok(())
}

#[test]
fn test_check_config_rejects_unknown_field() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_file(&dir, "typo.json", r#"{ "jiter": false }"#)?;
    stickctl()?
        .arg("check-config")
        .arg(&path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("jiter"));
    Ok(())
}

#[test]
fn test_check_config_missing_file() -> TestResult {
    let dir = TempDir::new()?;
    stickctl()?
        .arg("check-config")
        .arg(dir.path().join("absent.json"))
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn test_replay_file_json_output() -> TestResult {
    let dir = TempDir::new()?;
    let config = pure_easing_config(&dir)?;
    let trace = write_file(
        &dir,
        "trace.jsonl",
        "# dash right\n{\"x\": 208, \"y\": 128, \"repeat\": 10}\n",
    )?;
    let output = stickctl()?
        .args(["--json", "replay", "--config"])
        .arg(&config)
        .arg(&trace)
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let records: Vec<Value> = stdout
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(records.len(), 10);
    let xs: Vec<u64> = records.iter().filter_map(|r| r["x"].as_u64()).collect();
    assert_eq!(xs, vec![128, 141, 154, 168, 181, 194, 208, 208, 208, 208]);
    Ok(())
}

#[test]
fn test_replay_reads_stdin() -> TestResult {
    let dir = TempDir::new()?;
    let config = pure_easing_config(&dir)?;
    stickctl()?
        .args(["replay", "--config"])
        .arg(&config)
        .arg("-")
        .write_stdin("{\"x\": 208, \"y\": 128, \"repeat\": 7}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("out 208,128"));
    Ok(())
}

#[test]
fn test_replay_crouch_jump_is_flagged() -> TestResult {
    let dir = TempDir::new()?;
    let trace = write_file(
        &dir,
        "jump.jsonl",
        "{\"x\": 128, \"y\": 60, \"repeat\": 30}\n{\"x\": 128, \"y\": 170, \"up\": true, \"repeat\": 40}\n",
    )?;
    let config = write_file(&dir, "steady.json", r#"{ "jitter": false }"#)?;
    stickctl()?
        .args(["replay", "--config"])
        .arg(&config)
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("jump"));
    Ok(())
}

#[test]
fn test_replay_malformed_trace_reports_line() -> TestResult {
    let dir = TempDir::new()?;
    let trace = write_file(&dir, "bad.jsonl", "{\"x\": 1, \"y\": 2}\n{\"x\": 1}\n")?;
    stickctl()?
        .arg("replay")
        .arg(&trace)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Trace line 2"));
    Ok(())
}

#[test]
fn test_replay_rejects_zero_spacing() -> TestResult {
    stickctl()?
        .args(["replay", "--spacing", "0", "-"])
        .write_stdin("")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("sample spacing"));
    Ok(())
}

#[test]
fn test_json_error_output() -> TestResult {
    let dir = TempDir::new()?;
    let output = stickctl()?
        .args(["--json", "check-config"])
        .arg(dir.path().join("absent.json"))
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["success"], Value::Bool(false));
    Ok(())
}
