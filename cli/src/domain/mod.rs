//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, or any SDK crate.
//! All functions are synchronous and take data in, returning data out.

pub mod error;
pub mod event;
pub mod invocation;
pub mod retry;
pub mod shell;

pub use error::{EventError, ExecutionError};
pub use event::{Action, DownloadRequest, UploadRequest};
pub use invocation::CommandInvocation;
pub use retry::RetryPolicy;
