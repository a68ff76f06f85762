//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, or any SDK crate.

use ec2ops_common::InvocationStatus;
use thiserror::Error;

// ── Event errors ──────────────────────────────────────────────────────────────

/// Reasons an inbound event is turned away before any remote call.
///
/// The `Display` text is the soft `message` returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("Invalid action. Use start_ec2, stop_ec2, upload_file, or download_file.")]
    InvalidAction,

    #[error("Event must be a JSON object.")]
    NotAnObject,

    #[error("Instance IDs not provided.")]
    MissingInstanceIds,

    #[error("Instance IDs must be non-empty strings.")]
    InvalidInstanceIds,

    #[error("Missing parameters for file upload.")]
    MissingUploadParameters,

    #[error("Missing parameters for file download.")]
    MissingDownloadParameters,
}

// ── Execution errors ──────────────────────────────────────────────────────────

/// Failures of a remote command run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Failed to submit command: {0}")]
    Submit(String),

    #[error("Failed to poll command status: {0}")]
    Poll(String),

    /// The command reached a terminal non-success status.
    #[error("Command failed: {stderr}")]
    CommandFailed {
        status: InvocationStatus,
        stderr: String,
    },

    #[error("Command execution did not complete within retry limit.")]
    Timeout { attempts: u32 },

    #[error("Command succeeded but printed nothing.")]
    EmptyOutput,
}

impl ExecutionError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
