//! Snapshot of one remote command invocation.

use ec2ops_common::InvocationStatus;

/// What the execution service reported for `(command_id, instance_id)` at one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command_id: String,
    pub instance_id: String,
    pub status: InvocationStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandInvocation {
    /// An invocation the service has accepted but not yet reported on.
    #[must_use]
    pub fn pending(command_id: &str, instance_id: &str) -> Self {
        Self {
            command_id: command_id.to_string(),
            instance_id: instance_id.to_string(),
            status: InvocationStatus::Pending,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}
