//! Shared types for the ec2ops dispatcher: the response wire shape, remote
//! invocation statuses, and the env-loadable configuration.

pub mod config;
pub mod types;

pub use config::{BackoffKind, ConfigError, DispatcherConfig};
pub use types::*;
