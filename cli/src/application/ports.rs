//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `ec2ops_common`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use anyhow::Result;
use ec2ops_common::InstanceStateChange;

use crate::domain::CommandInvocation;

// ── Compute Port ──────────────────────────────────────────────────────────────

/// Instance power control by identifier list.
#[allow(async_fn_in_trait)]
pub trait ComputeControl {
    /// Start the given instances and return the state transitions reported.
    async fn start_instances(&self, instance_ids: &[String]) -> Result<Vec<InstanceStateChange>>;
    /// Stop the given instances and return the state transitions reported.
    async fn stop_instances(&self, instance_ids: &[String]) -> Result<Vec<InstanceStateChange>>;
}

// ── Remote Execution Port ─────────────────────────────────────────────────────

/// Asynchronous shell execution on a named instance.
///
/// Submission returns immediately; completion is observed by polling
/// [`CommandExecution::get_invocation`].
#[allow(async_fn_in_trait)]
pub trait CommandExecution {
    /// Submit `command` to run on `instance_id`; returns the command identifier.
    async fn send_command(&self, instance_id: &str, command: &str) -> Result<String>;

    /// Fetch the current state of a submitted command on one instance.
    ///
    /// Implementations report an invocation the service does not know about
    /// yet as `Pending` rather than as an error.
    async fn get_invocation(&self, command_id: &str, instance_id: &str)
    -> Result<CommandInvocation>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

/// Reporter that discards everything (JSON mode, tests).
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
