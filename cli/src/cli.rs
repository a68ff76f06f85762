//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ec2ops_common::{ActionKind, BackoffKind};

use crate::app::{AppContext, AppFlags, ConfigOverrides, OutputFlags};
use crate::commands;

/// Start/stop EC2 instances and move files between instances and S3
#[derive(Parser)]
#[command(
    name = "ec2ops",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub polling: PollingArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the `EC2OPS_*` polling and region settings.
#[derive(Args, Debug, Default)]
pub struct PollingArgs {
    /// Status polls before giving up on a remote command
    #[arg(long, global = true, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Base delay between status polls
    #[arg(long, global = true, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    /// How the delay grows between polls
    #[arg(long, global = true, value_enum)]
    pub backoff: Option<BackoffKind>,

    /// AWS region (defaults to the SDK provider chain)
    #[arg(long, global = true)]
    pub region: Option<String>,
}

impl From<PollingArgs> for ConfigOverrides {
    fn from(args: PollingArgs) -> Self {
        Self {
            max_attempts: args.max_attempts,
            retry_delay_ms: args.retry_delay_ms,
            backoff: args.backoff,
            region: args.region,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Dispatch a raw event
    Invoke(commands::invoke::InvokeArgs),

    /// Start instances
    Start(commands::instances::InstancesArgs),

    /// Stop instances
    Stop(commands::instances::InstancesArgs),

    /// Upload a file from an instance to a bucket
    Upload(commands::transfer::UploadArgs),

    /// Download an object from a bucket onto an instance
    Download(commands::transfer::DownloadArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or input cannot be loaded. Dispatch
    /// outcomes are reported through the exit code, not as errors.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            polling,
            command,
        } = self;

        let event = match command {
            Command::Version => {
                commands::version::run(json)?;
                return Ok(ExitCode::SUCCESS);
            }
            Command::Invoke(args) => commands::invoke::read_event(&args).await?,
            Command::Start(args) => commands::instances::event(ActionKind::StartEc2, &args),
            Command::Stop(args) => commands::instances::event(ActionKind::StopEc2, &args),
            Command::Upload(args) => commands::transfer::upload_event(&args),
            Command::Download(args) => commands::transfer::download_event(&args),
        };

        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            overrides: polling.into(),
        });
        commands::dispatch::run(&app, &event).await
    }
}
