use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action names accepted in the `action` field of an inbound event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    StartEc2,
    StopEc2,
    UploadFile,
    DownloadFile,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::StartEc2,
        ActionKind::StopEc2,
        ActionKind::UploadFile,
        ActionKind::DownloadFile,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::StartEc2 => "start_ec2",
            ActionKind::StopEc2 => "stop_ec2",
            ActionKind::UploadFile => "upload_file",
            ActionKind::DownloadFile => "download_file",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"Start_EC2"` parses as [`ActionKind::StartEc2`].
impl FromStr for ActionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or(())
    }
}

/// Status of a remote command invocation as reported by the execution service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationStatus {
    Pending,
    InProgress,
    Delayed,
    Success,
    Failed,
    Cancelled,
    TimedOut,
    Cancelling,
    /// A status string this build does not know about.
    Unknown(String),
}

impl InvocationStatus {
    /// Map the service's status string. Unrecognised values are kept verbatim.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Pending" => Self::Pending,
            "InProgress" => Self::InProgress,
            "Delayed" => Self::Delayed,
            "Success" => Self::Success,
            "Failed" => Self::Failed,
            "Cancelled" => Self::Cancelled,
            "TimedOut" => Self::TimedOut,
            "Cancelling" => Self::Cancelling,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Delayed => "Delayed",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::TimedOut => "TimedOut",
            Self::Cancelling => "Cancelling",
            Self::Unknown(raw) => raw,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The command stopped without succeeding and will not change state again.
    #[must_use]
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled | Self::TimedOut)
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a start/stop instances result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceStateChange {
    pub instance_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<String>,
}

/// Coarse result of a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Rejected,
    Failed,
}

/// Response returned for every event.
///
/// Serializes to the flat mapping callers expect: `{message, response?}` on
/// success, `{message}` for a soft rejection, `{error}` for a failed call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        response: Option<Value>,
    },
    Rejected {
        message: String,
    },
    Failed {
        error: String,
    },
}

impl Response {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
            response: None,
        }
    }

    pub fn success_with(message: impl Into<String>, response: Value) -> Self {
        Self::Success {
            message: message.into(),
            response: Some(response),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Success { .. } => Outcome::Success,
            Self::Rejected { .. } => Outcome::Rejected,
            Self::Failed { .. } => Outcome::Failed,
        }
    }

    /// The `message` text, if this shape carries one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. } | Self::Rejected { message } => Some(message),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}
