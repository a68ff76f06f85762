use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Upper bound for the base retry delay.
pub const MAX_RETRY_DELAY_MS: u64 = 60 * 60 * 1000;

/// How the delay between status polls grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// Same delay before every poll.
    #[default]
    Fixed,
    /// Delay grows by the base delay each attempt.
    Linear,
    /// Delay doubles each attempt.
    Exponential,
}

impl BackoffKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BackoffKind::Fixed => "fixed",
            BackoffKind::Linear => "linear",
            BackoffKind::Exponential => "exponential",
        }
    }
}

impl fmt::Display for BackoffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackoffKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(BackoffKind::Fixed),
            "linear" => Ok(BackoffKind::Linear),
            "exponential" => Ok(BackoffKind::Exponential),
            _ => Err(ConfigError::InvalidValue {
                key: "backoff",
                value: s.to_string(),
                reason: "expected one of: fixed, linear, exponential".to_string(),
            }),
        }
    }
}

// Parsed through `FromStr` so env strings and config files share one spelling.
impl<'de> Deserialize<'de> for BackoffKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Dispatcher configuration.
///
/// Loaded from `EC2OPS_*` environment variables; every field has a default so
/// an empty environment yields the stock behaviour (5 polls, 2s apart).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DispatcherConfig {
    /// Status polls before giving up on a remote command.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay before each poll, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default)]
    pub backoff: BackoffKind,

    /// Cap applied to the grown delay.
    #[serde(default)]
    pub max_delay_ms: Option<u64>,

    /// Remote execution document used to run shell commands.
    #[serde(default = "default_document_name")]
    pub document_name: String,

    /// Storage CLI invoked on the instance for transfers.
    #[serde(default = "default_storage_cli")]
    pub storage_cli: String,

    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override, e.g. a local emulator.
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_document_name() -> String {
    "AWS-RunShellScript".to_string()
}

fn default_storage_cli() -> String {
    "aws".to_string()
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            backoff: BackoffKind::default(),
            max_delay_ms: None,
            document_name: default_document_name(),
            storage_cli: default_storage_cli(),
            region: None,
            endpoint_url: None,
        }
    }
}

impl DispatcherConfig {
    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_delay_ms > MAX_RETRY_DELAY_MS {
            return Err(ConfigError::InvalidValue {
                key: "retry_delay_ms",
                value: self.retry_delay_ms.to_string(),
                reason: format!("must be at most {MAX_RETRY_DELAY_MS}"),
            });
        }
        if let Some(cap) = self.max_delay_ms
            && cap < self.retry_delay_ms
        {
            return Err(ConfigError::InvalidValue {
                key: "max_delay_ms",
                value: cap.to_string(),
                reason: format!("must be at least retry_delay_ms ({})", self.retry_delay_ms),
            });
        }
        if self.document_name.trim().is_empty() {
            return Err(ConfigError::Empty("document_name"));
        }
        if self.storage_cli.trim().is_empty() {
            return Err(ConfigError::Empty("storage_cli"));
        }
        Ok(())
    }
}
