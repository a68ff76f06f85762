//! Integration tests for the ec2ops CLI surface
//!
//! Only paths that are answered before any AWS call are exercised here, so
//! these run without credentials or network access.

#![allow(clippy::expect_used)]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};

fn ec2ops() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ec2ops"));
    cmd.env("NO_COLOR", "1");
    for var in [
        "EC2OPS_MAX_ATTEMPTS",
        "EC2OPS_RETRY_DELAY_MS",
        "EC2OPS_BACKOFF",
        "EC2OPS_MAX_DELAY_MS",
        "EC2OPS_DOCUMENT_NAME",
        "EC2OPS_STORAGE_CLI",
        "EC2OPS_REGION",
        "EC2OPS_ENDPOINT_URL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help() {
    ec2ops().assert().code(2).stderr(predicate::str::contains(
        "Start/stop EC2 instances and move files between instances and S3",
    ));
}

#[test]
fn test_help_lists_every_command() {
    let output = ec2ops().arg("--help").output().expect("run");
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for command in ["invoke", "start", "stop", "upload", "download", "version"] {
        assert!(help.contains(command), "missing {command} in:\n{help}");
    }
}

#[test]
fn test_version_command_shows_version() {
    ec2ops()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ec2ops 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = ec2ops()
        .args(["--json", "version"])
        .output()
        .expect("run");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), json!({"version": "0.1.0"}));
}

// --- Event rejection ---

#[test]
fn test_invoke_invalid_action_is_soft_rejection() {
    let output = ec2ops()
        .args(["--json", "invoke", r#"{"action": "reboot"}"#])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stdout_json(&output),
        json!({"message": "Invalid action. Use start_ec2, stop_ec2, upload_file, or download_file."})
    );
}

#[test]
fn test_invoke_reads_event_from_stdin() {
    let output = ec2ops()
        .args(["--json", "invoke"])
        .write_stdin(r#"{"action": "start_ec2"}"#)
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stdout_json(&output),
        json!({"message": "Instance IDs not provided."})
    );
}

#[test]
fn test_invoke_reads_event_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(
        file,
        r#"{{"action": "download_file", "instance_id": "i-1", "s3_bucket": "b"}}"#
    )
    .expect("write");

    let output = ec2ops()
        .arg("--json")
        .arg("invoke")
        .arg("--event")
        .arg(file.path())
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stdout_json(&output),
        json!({"message": "Missing parameters for file download."})
    );
}

#[test]
fn test_invoke_non_object_event_is_rejected() {
    ec2ops()
        .args(["--json", "invoke", r#"["start_ec2"]"#])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Event must be a JSON object."));
}

#[test]
fn test_invoke_malformed_json_is_an_error() {
    let output = ec2ops()
        .args(["--json", "invoke", "{not json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let body = stdout_json(&output);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.contains("invalid JSON")),
        "unexpected body {body}"
    );
}

#[test]
fn test_upload_with_blank_instance_is_rejected() {
    ec2ops()
        .args(["upload", "--instance", "", "--bucket", "b", "sample.txt"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Missing parameters for file upload."));
}

#[test]
fn test_start_requires_an_instance_id() {
    ec2ops()
        .arg("start")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("INSTANCE_ID"));
}

// --- Configuration ---

const VALID_STOP: &str = r#"{"action": "stop_ec2", "instance_ids": ["i-1"]}"#;

#[test]
fn test_bad_env_config_is_reported() {
    ec2ops()
        .env("EC2OPS_BACKOFF", "wobbly")
        .args(["invoke", VALID_STOP])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("EC2OPS_"));
}

#[test]
fn test_overridden_delay_is_validated() {
    ec2ops()
        .args(["--retry-delay-ms", "999999999", "invoke", VALID_STOP])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_rejection_does_not_depend_on_env_config() {
    let output = ec2ops()
        .env("EC2OPS_MAX_ATTEMPTS", "many")
        .args(["--json", "invoke", r#"{"action": "reboot"}"#])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stdout_json(&output),
        json!({"message": "Invalid action. Use start_ec2, stop_ec2, upload_file, or download_file."})
    );
}

#[test]
fn test_backoff_flag_accepts_known_values_only() {
    ec2ops()
        .args(["--backoff", "random", "version"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("possible values"));
}
