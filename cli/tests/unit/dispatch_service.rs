//! Event dispatch against recording fakes.

#![allow(clippy::expect_used)]

use std::cell::RefCell;
use std::time::Duration;

use ec2ops_cli::application::services::dispatch::{CWD_UNAVAILABLE, Dispatcher, reject};
use ec2ops_cli::application::{ProgressReporter, SilentReporter};
use ec2ops_cli::domain::{EventError, RetryPolicy};
use ec2ops_common::{Outcome, Response};
use serde_json::{Value, json};

use crate::mocks::{Poll, RecordingCompute, ScriptedExecution};

fn dispatcher(
    compute: RecordingCompute,
    exec: ScriptedExecution,
) -> Dispatcher<RecordingCompute, ScriptedExecution> {
    Dispatcher::new(compute, exec, RetryPolicy::fixed(3, Duration::from_secs(1)))
}

fn to_json(response: &Response) -> Value {
    serde_json::to_value(response).expect("serialize")
}

/// Collects reporter events as `kind: message` lines.
#[derive(Default)]
struct RecordingReporter(RefCell<Vec<String>>);

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.0.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.0.borrow_mut().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.0.borrow_mut().push(format!("warn: {message}"));
    }
}

// ── Start / stop ──────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn start_reports_ids_and_state_changes() {
    let d = dispatcher(RecordingCompute::default(), ScriptedExecution::default());

    let response = d
        .handle(
            &json!({"action": "start_ec2", "instance_ids": ["i-1", "i-2"]}),
            &SilentReporter,
        )
        .await;

    assert_eq!(response.outcome(), Outcome::Success);
    assert_eq!(
        to_json(&response),
        json!({
            "message": "Starting instances: i-1, i-2",
            "response": [
                {"instance_id": "i-1", "previous_state": "stopped", "current_state": "pending"},
                {"instance_id": "i-2", "previous_state": "stopped", "current_state": "pending"},
            ],
        })
    );
    assert_eq!(
        *d.compute().started.lock().expect("lock"),
        vec![vec!["i-1".to_string(), "i-2".to_string()]]
    );
}

#[tokio::test(start_paused = true)]
async fn stop_calls_stop_only() {
    let d = dispatcher(RecordingCompute::default(), ScriptedExecution::default());

    let response = d
        .handle(&json!({"action": "STOP_EC2", "instance_ids": ["i-9"]}), &SilentReporter)
        .await;

    assert_eq!(response.message(), Some("Stopping instances: i-9"));
    assert!(d.compute().started.lock().expect("lock").is_empty());
    assert_eq!(d.compute().stopped.lock().expect("lock").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn missing_instance_ids_makes_no_call() {
    let d = dispatcher(RecordingCompute::default(), ScriptedExecution::default());

    let response = d.handle(&json!({"action": "start_ec2"}), &SilentReporter).await;

    assert_eq!(to_json(&response), json!({"message": "Instance IDs not provided."}));
    assert_eq!(d.compute().calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn compute_error_becomes_error_response() {
    let d = dispatcher(
        RecordingCompute::failing("UnauthorizedOperation"),
        ScriptedExecution::default(),
    );

    let response = d
        .handle(&json!({"action": "start_ec2", "instance_ids": ["i-1"]}), &SilentReporter)
        .await;

    assert_eq!(response.outcome(), Outcome::Failed);
    assert!(
        response
            .error()
            .is_some_and(|e| e.contains("UnauthorizedOperation"))
    );
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn unknown_action_is_rejected_without_calls() {
    let d = dispatcher(RecordingCompute::default(), ScriptedExecution::default());

    for event in [json!({"action": "reboot"}), json!({}), json!({"action": 7})] {
        let response = d.handle(&event, &SilentReporter).await;
        assert_eq!(
            to_json(&response),
            json!({"message": "Invalid action. Use start_ec2, stop_ec2, upload_file, or download_file."})
        );
    }
    assert_eq!(d.compute().calls(), 0);
    assert!(d.commands().sent_commands().is_empty());
}

#[tokio::test(start_paused = true)]
async fn handle_rejects_through_shared_helper() {
    let d = dispatcher(RecordingCompute::default(), ScriptedExecution::default());

    let response = d.handle(&json!({"action": "stop_ec2"}), &SilentReporter).await;

    assert_eq!(response, reject(&EventError::MissingInstanceIds));
    assert_eq!(response.outcome(), Outcome::Rejected);
}

// ── Upload ────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn upload_resolves_relative_path_against_cwd() {
    let exec = ScriptedExecution::default()
        .then(vec![Poll::success("/home/ec2-user\n")])
        .then(vec![Poll::pending(), Poll::success("upload: ok")]);
    let d = dispatcher(RecordingCompute::default(), exec);
    let reporter = RecordingReporter::default();

    let response = d
        .handle(
            &json!({
                "action": "upload_file",
                "instance_id": "i-1",
                "local_file_path": "sample.txt",
                "s3_bucket": "b",
                "s3_key": "k",
            }),
            &reporter,
        )
        .await;

    assert_eq!(
        to_json(&response),
        json!({"message": "File uploaded to S3 bucket b with key k"})
    );
    assert_eq!(
        d.commands().sent_commands(),
        vec!["pwd", "aws s3 cp /home/ec2-user/sample.txt s3://b/k"]
    );
    assert!(
        reporter
            .0
            .borrow()
            .contains(&"success: working directory is /home/ec2-user".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn upload_without_key_uses_file_name() {
    let exec = ScriptedExecution::default()
        .then(vec![Poll::success("/srv\n")])
        .then(vec![Poll::success("")]);
    let d = dispatcher(RecordingCompute::default(), exec);

    let response = d
        .handle(
            &json!({
                "action": "upload_file",
                "instance_id": "i-1",
                "local_file_path": "logs/app.log",
                "s3_bucket": "b",
            }),
            &SilentReporter,
        )
        .await;

    assert_eq!(
        response.message(),
        Some("File uploaded to S3 bucket b with key app.log")
    );
    assert_eq!(
        d.commands().sent_commands()[1],
        "aws s3 cp /srv/logs/app.log s3://b/app.log"
    );
}

#[tokio::test(start_paused = true)]
async fn upload_with_unusable_cwd_is_soft_rejection() {
    let exec = ScriptedExecution::default().then(vec![Poll::failed("agent offline")]);
    let d = dispatcher(RecordingCompute::default(), exec);

    let response = d
        .handle(
            &json!({
                "action": "upload_file",
                "instance_id": "i-1",
                "local_file_path": "a.txt",
                "s3_bucket": "b",
                "s3_key": "k",
            }),
            &SilentReporter,
        )
        .await;

    assert_eq!(to_json(&response), json!({"message": CWD_UNAVAILABLE}));
    assert_eq!(d.commands().sent_commands(), vec!["pwd"]);
}

#[tokio::test(start_paused = true)]
async fn upload_missing_bucket_is_rejected_without_commands() {
    let d = dispatcher(RecordingCompute::default(), ScriptedExecution::default());

    let response = d
        .handle(
            &json!({"action": "upload_file", "instance_id": "i-1", "local_file_path": "a"}),
            &SilentReporter,
        )
        .await;

    assert_eq!(response.message(), Some("Missing parameters for file upload."));
    assert!(d.commands().sent_commands().is_empty());
}

#[tokio::test(start_paused = true)]
async fn upload_quotes_paths_with_spaces() {
    let exec = ScriptedExecution::default()
        .then(vec![Poll::success("/home/ec2-user")])
        .then(vec![Poll::success("")]);
    let d = dispatcher(RecordingCompute::default(), exec).with_storage_cli("/usr/local/bin/aws");

    d.handle(
        &json!({
            "action": "upload_file",
            "instance_id": "i-1",
            "local_file_path": "my report.txt",
            "s3_bucket": "b",
            "s3_key": "k; rm -rf /",
        }),
        &SilentReporter,
    )
    .await;

    assert_eq!(
        d.commands().sent_commands()[1],
        "/usr/local/bin/aws s3 cp '/home/ec2-user/my report.txt' 's3://b/k; rm -rf /'"
    );
}

// ── Download ──────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn download_runs_single_command() {
    let exec = ScriptedExecution::default().then(vec![Poll::success("download: ok")]);
    let d = dispatcher(RecordingCompute::default(), exec);

    let response = d
        .handle(
            &json!({
                "action": "download_file",
                "instance_id": "i-1",
                "s3_bucket": "b",
                "s3_key": "k",
                "remote_file_path": "/p",
            }),
            &SilentReporter,
        )
        .await;

    assert_eq!(
        to_json(&response),
        json!({"message": "File k downloaded from S3 bucket b to /p"})
    );
    assert_eq!(d.commands().sent_commands(), vec!["aws s3 cp s3://b/k /p"]);
}

#[tokio::test(start_paused = true)]
async fn download_failure_becomes_error_response() {
    let exec = ScriptedExecution::default().then(vec![Poll::failed("fatal error: 403")]);
    let d = dispatcher(RecordingCompute::default(), exec);

    let response = d
        .handle(
            &json!({
                "action": "download_file",
                "instance_id": "i-1",
                "s3_bucket": "b",
                "s3_key": "k",
                "remote_file_path": "/p",
            }),
            &SilentReporter,
        )
        .await;

    assert_eq!(to_json(&response), json!({"error": "Command failed: fatal error: 403"}));
}

#[tokio::test(start_paused = true)]
async fn download_timeout_becomes_error_response() {
    let d = dispatcher(RecordingCompute::default(), ScriptedExecution::default());

    let response = d
        .handle(
            &json!({
                "action": "download_file",
                "instance_id": "i-1",
                "s3_bucket": "b",
                "s3_key": "k",
                "remote_file_path": "/p",
            }),
            &SilentReporter,
        )
        .await;

    assert_eq!(
        response.error(),
        Some("Command execution did not complete within retry limit.")
    );
    assert_eq!(d.commands().poll_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn download_missing_path_is_rejected() {
    let d = dispatcher(RecordingCompute::default(), ScriptedExecution::default());

    let response = d
        .handle(
            &json!({"action": "download_file", "instance_id": "i-1", "s3_bucket": "b", "s3_key": "k"}),
            &SilentReporter,
        )
        .await;

    assert_eq!(response.message(), Some("Missing parameters for file download."));
    assert!(d.commands().sent_commands().is_empty());
}
