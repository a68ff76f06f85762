//! Run a shell command on an instance and wait for it to settle.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use tracing::{debug, info, warn};

use crate::application::ports::CommandExecution;
use crate::application::services::poll::{PollError, Probe, poll_until};
use crate::domain::shell::PWD_COMMAND;
use crate::domain::{ExecutionError, RetryPolicy};

/// Submit `command` to `instance_id` once, then poll until it settles.
///
/// Returns the captured standard output of the first successful poll.
/// Blocks the caller for at most `policy.total_wait()` plus service latency.
/// Giving up does not cancel the remote command.
///
/// # Errors
///
/// - [`ExecutionError::Submit`] if the service refuses the command.
/// - [`ExecutionError::Poll`] if a status query fails.
/// - [`ExecutionError::CommandFailed`] on a terminal non-success status.
/// - [`ExecutionError::Timeout`] when every poll came back unsettled.
pub async fn run(
    exec: &impl CommandExecution,
    instance_id: &str,
    command: &str,
    policy: &RetryPolicy,
) -> Result<String, ExecutionError> {
    let command_id = exec
        .send_command(instance_id, command)
        .await
        .map_err(|e| ExecutionError::Submit(format!("{e:#}")))?;
    info!(instance_id, command_id = %command_id, "command submitted");

    let command_id = command_id.as_str();
    let outcome = poll_until(policy, |attempt| async move {
        match exec.get_invocation(command_id, instance_id).await {
            Ok(invocation) if invocation.status.is_success() => Probe::Ready(invocation.stdout),
            Ok(invocation) if invocation.status.is_terminal_failure() => {
                Probe::Failed(ExecutionError::CommandFailed {
                    status: invocation.status,
                    stderr: invocation.stderr,
                })
            }
            Ok(invocation) => {
                debug!(command_id, attempt, status = %invocation.status, "command not settled");
                Probe::Pending
            }
            Err(e) => Probe::Failed(ExecutionError::Poll(format!("{e:#}"))),
        }
    })
    .await;

    match outcome {
        Ok(stdout) => {
            info!(instance_id, command_id, "command succeeded");
            Ok(stdout)
        }
        Err(PollError::Failed(err)) => {
            warn!(instance_id, command_id, error = %err, "command failed");
            Err(err)
        }
        Err(PollError::Exhausted { attempts }) => {
            warn!(instance_id, command_id, attempts, "command did not settle in time");
            Err(ExecutionError::Timeout { attempts })
        }
    }
}

/// Working directory of the instance's command shell, trimmed.
///
/// # Errors
///
/// Any [`run`] error, or [`ExecutionError::EmptyOutput`] if `pwd` printed
/// only whitespace.
pub async fn try_resolve_cwd(
    exec: &impl CommandExecution,
    instance_id: &str,
    policy: &RetryPolicy,
) -> Result<String, ExecutionError> {
    let stdout = run(exec, instance_id, PWD_COMMAND, policy).await?;
    let cwd = stdout.trim();
    if cwd.is_empty() {
        return Err(ExecutionError::EmptyOutput);
    }
    Ok(cwd.to_string())
}

/// Like [`try_resolve_cwd`] but collapses every failure to `None`.
///
/// The cause is logged, not returned.
pub async fn resolve_cwd(
    exec: &impl CommandExecution,
    instance_id: &str,
    policy: &RetryPolicy,
) -> Option<String> {
    match try_resolve_cwd(exec, instance_id, policy).await {
        Ok(cwd) => Some(cwd),
        Err(err) => {
            warn!(instance_id, error = %err, "Error getting working directory");
            None
        }
    }
}
