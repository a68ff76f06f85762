//! `ec2ops invoke`: dispatch a raw event, the way the cloud-function trigger does.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tokio::io::AsyncReadExt;

/// Arguments for the invoke command.
#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Read the event from a file (`-` for stdin)
    #[arg(long, short = 'e', value_name = "FILE", conflicts_with = "event_json")]
    pub event: Option<PathBuf>,

    /// Event as inline JSON. Without this or --event, stdin is read.
    #[arg(value_name = "EVENT_JSON")]
    pub event_json: Option<String>,
}

/// Load and parse the event named by `args`.
///
/// # Errors
///
/// Returns an error if the source cannot be read or is not valid JSON.
pub async fn read_event(args: &InvokeArgs) -> Result<Value> {
    let (raw, source) = match (&args.event_json, &args.event) {
        (Some(inline), _) => (inline.clone(), "inline event".to_string()),
        (None, Some(path)) if path.as_os_str() != "-" => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?;
            (raw, path.display().to_string())
        }
        (None, _) => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("cannot read event from stdin")?;
            (raw, "stdin".to_string())
        }
    };
    parse_event(&raw).with_context(|| format!("invalid JSON in {source}"))
}

fn parse_event(raw: &str) -> Result<Value> {
    Ok(serde_json::from_str(raw.trim())?)
}
