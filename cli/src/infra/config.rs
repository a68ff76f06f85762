//! Load [`DispatcherConfig`] from `EC2OPS_*` environment variables.

use anyhow::{Context, Result};
use ec2ops_common::DispatcherConfig;

pub const ENV_PREFIX: &str = "EC2OPS_";

/// Read and validate configuration from the process environment.
///
/// # Errors
///
/// Returns an error if a variable cannot be parsed or the result fails
/// validation.
pub fn load_from_env() -> Result<DispatcherConfig> {
    from_vars(std::env::vars())
}

/// Read and validate configuration from explicit `(name, value)` pairs.
///
/// # Errors
///
/// Same as [`load_from_env`].
pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<DispatcherConfig> {
    let config: DispatcherConfig = envy::prefixed(ENV_PREFIX)
        .from_iter(vars)
        .context("failed to load config from EC2OPS_* env vars")?;
    config
        .validate()
        .context("invalid EC2OPS_* configuration")?;
    tracing::debug!(
        max_attempts = config.max_attempts,
        retry_delay_ms = config.retry_delay_ms,
        backoff = %config.backoff,
        document = %config.document_name,
        "configuration loaded",
    );
    Ok(config)
}
