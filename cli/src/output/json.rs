//! JSON output helpers.
//!
//! `--json` prints the response exactly as a cloud-function caller would
//! receive it. Errors raised before dispatch use the same `{error}` shape.

use anyhow::{Context, Result};
use ec2ops_common::Response;

/// Pretty-print a dispatcher response.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_response(response: &Response) -> Result<String> {
    serde_json::to_string_pretty(response).context("JSON serialization failed")
}

/// Format an error raised outside the dispatcher (bad flags, config, input).
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str) -> Result<String> {
    format_response(&Response::failed(message))
}
