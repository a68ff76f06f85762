//! Event dispatch: parse the event, run the matching handler, build the response.
//!
//! Every failure path ends in a [`Response`]; nothing propagates to the caller.

use ec2ops_common::{InstanceStateChange, Response};
use serde_json::Value;
use tracing::{info, warn};

use crate::application::ports::{CommandExecution, ComputeControl, ProgressReporter};
use crate::application::services::remote_command::{resolve_cwd, run};
use crate::domain::shell::{download_command, join_remote_path, s3_uri, upload_command};
use crate::domain::{Action, DownloadRequest, EventError, RetryPolicy, UploadRequest};

/// Soft message when `pwd` on the instance yields nothing usable.
pub const CWD_UNAVAILABLE: &str = "Could not get the working directory from the EC2 instance.";

const DEFAULT_STORAGE_CLI: &str = "aws";

#[derive(Debug, Clone, Copy)]
enum Power {
    Start,
    Stop,
}

impl Power {
    fn verb(self) -> &'static str {
        match self {
            Power::Start => "Starting",
            Power::Stop => "Stopping",
        }
    }
}

/// Soft response for an event that failed validation.
#[must_use]
pub fn reject(rejection: &EventError) -> Response {
    info!(%rejection, "event rejected");
    Response::rejected(rejection.to_string())
}

/// Routes events to the compute and remote-execution ports.
///
/// Generic over both ports so tests inject recording fakes.
pub struct Dispatcher<C: ComputeControl, X: CommandExecution> {
    compute: C,
    commands: X,
    policy: RetryPolicy,
    storage_cli: String,
}

impl<C: ComputeControl, X: CommandExecution> Dispatcher<C, X> {
    pub fn new(compute: C, commands: X, policy: RetryPolicy) -> Self {
        Self {
            compute,
            commands,
            policy,
            storage_cli: DEFAULT_STORAGE_CLI.to_string(),
        }
    }

    /// Program used on the instance for bucket copies (default `aws`).
    #[must_use]
    pub fn with_storage_cli(mut self, storage_cli: impl Into<String>) -> Self {
        self.storage_cli = storage_cli.into();
        self
    }

    pub fn compute(&self) -> &C {
        &self.compute
    }

    pub fn commands(&self) -> &X {
        &self.commands
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Handle a raw inbound event.
    pub async fn handle(&self, event: &Value, reporter: &impl ProgressReporter) -> Response {
        match Action::from_event(event) {
            Ok(action) => self.handle_action(action, reporter).await,
            Err(rejection) => reject(&rejection),
        }
    }

    /// Handle an already-validated action.
    pub async fn handle_action(&self, action: Action, reporter: &impl ProgressReporter) -> Response {
        info!(action = %action.kind(), "dispatching");
        match action {
            Action::StartInstances { instance_ids } => {
                self.power(Power::Start, &instance_ids, reporter).await
            }
            Action::StopInstances { instance_ids } => {
                self.power(Power::Stop, &instance_ids, reporter).await
            }
            Action::Upload(request) => self.upload(&request, reporter).await,
            Action::Download(request) => self.download(&request, reporter).await,
        }
    }

    async fn power(
        &self,
        power: Power,
        instance_ids: &[String],
        reporter: &impl ProgressReporter,
    ) -> Response {
        let ids = instance_ids.join(", ");
        let message = format!("{} instances: {ids}", power.verb());
        reporter.step(&message);

        let result = match power {
            Power::Start => self.compute.start_instances(instance_ids).await,
            Power::Stop => self.compute.stop_instances(instance_ids).await,
        };
        let changes = match result {
            Ok(changes) => changes,
            Err(e) => {
                let error = format!("{e:#}");
                warn!(instance_ids = %ids, %error, "instance power change failed");
                return Response::failed(error);
            }
        };

        for change in &changes {
            info!(
                instance_id = %change.instance_id,
                previous = change.previous_state.as_deref().unwrap_or("unknown"),
                current = change.current_state.as_deref().unwrap_or("unknown"),
                "instance state change",
            );
        }
        success_with_changes(message, &changes)
    }

    async fn upload(&self, request: &UploadRequest, reporter: &impl ProgressReporter) -> Response {
        reporter.step(&format!(
            "resolving working directory on {}",
            request.instance_id
        ));
        let Some(cwd) = resolve_cwd(&self.commands, &request.instance_id, &self.policy).await
        else {
            reporter.warn(CWD_UNAVAILABLE);
            return Response::rejected(CWD_UNAVAILABLE);
        };

        reporter.success(&format!("working directory is {cwd}"));

        let local_path = join_remote_path(&cwd, &request.local_file_path);
        let command = upload_command(
            &self.storage_cli,
            &local_path,
            &request.s3_bucket,
            &request.s3_key,
        );
        reporter.step(&format!(
            "uploading {local_path} to {}",
            s3_uri(&request.s3_bucket, &request.s3_key)
        ));

        match run(&self.commands, &request.instance_id, &command, &self.policy).await {
            Ok(_) => Response::success(format!(
                "File uploaded to S3 bucket {} with key {}",
                request.s3_bucket, request.s3_key
            )),
            Err(err) => Response::failed(err.to_string()),
        }
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        reporter: &impl ProgressReporter,
    ) -> Response {
        let command = download_command(
            &self.storage_cli,
            &request.s3_bucket,
            &request.s3_key,
            &request.remote_file_path,
        );
        reporter.step(&format!(
            "downloading {} to {}",
            s3_uri(&request.s3_bucket, &request.s3_key),
            request.remote_file_path
        ));

        match run(&self.commands, &request.instance_id, &command, &self.policy).await {
            Ok(_) => Response::success(format!(
                "File {} downloaded from S3 bucket {} to {}",
                request.s3_key, request.s3_bucket, request.remote_file_path
            )),
            Err(err) => Response::failed(err.to_string()),
        }
    }
}

fn success_with_changes(message: String, changes: &[InstanceStateChange]) -> Response {
    match serde_json::to_value(changes) {
        Ok(value) => Response::success_with(message, value),
        Err(e) => Response::failed(format!("encoding instance state changes: {e}")),
    }
}
