//! Application context: unified state passed to every command handler.
//!
//! `AppContext` carries output settings and the configuration overrides.
//! `EC2OPS_*` variables are read and AWS clients built only on demand by
//! [`AppContext::dispatcher`], so a rejected event never depends on either.

use anyhow::{Context, Result};
use ec2ops_common::{BackoffKind, DispatcherConfig};

use crate::application::services::dispatch::Dispatcher;
use crate::domain::RetryPolicy;
use crate::infra::aws::load_sdk_config;
use crate::infra::ec2::Ec2Compute;
use crate::infra::ssm::SsmCommandExecution;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// The raw response mapping as JSON.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Command-line values that take precedence over `EC2OPS_*` variables.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub max_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub backoff: Option<BackoffKind>,
    pub region: Option<String>,
}

impl ConfigOverrides {
    /// Overlay the set fields onto `config`.
    #[must_use]
    pub fn apply(&self, mut config: DispatcherConfig) -> DispatcherConfig {
        if let Some(n) = self.max_attempts {
            config.max_attempts = n;
        }
        if let Some(ms) = self.retry_delay_ms {
            config.retry_delay_ms = ms;
        }
        if let Some(backoff) = self.backoff {
            config.backoff = backoff;
        }
        if let Some(region) = &self.region {
            config.region = Some(region.clone());
        }
        config
    }
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Configuration overrides.
    pub overrides: ConfigOverrides,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Command-line values applied over the environment.
    pub overrides: ConfigOverrides,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: AppFlags) -> Self {
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            overrides: flags.overrides,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Resolve `EC2OPS_*` variables with the overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the overridden
    /// configuration is invalid.
    pub fn config(&self) -> Result<DispatcherConfig> {
        self.resolve(crate::infra::config::load_from_env()?)
    }

    fn resolve(&self, base: DispatcherConfig) -> Result<DispatcherConfig> {
        let config = self.overrides.apply(base);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// Build the production dispatcher backed by EC2 and Systems Manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be resolved.
    pub async fn dispatcher(&self) -> Result<Dispatcher<Ec2Compute, SsmCommandExecution>> {
        let config = self.config()?;
        let sdk = load_sdk_config(&config).await;
        Ok(Dispatcher::new(
            Ec2Compute::from_sdk_config(&sdk),
            SsmCommandExecution::from_sdk_config(&sdk, config.document_name.as_str()),
            RetryPolicy::from_config(&config),
        )
        .with_storage_cli(config.storage_cli.as_str()))
    }
}
