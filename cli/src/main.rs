//! ec2ops - start/stop instances and move files to and from S3 over remote commands

use std::process::ExitCode;

use clap::Parser;
use ec2ops_cli::cli::Cli;
use ec2ops_cli::output::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json_mode = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let rendered = if json_mode {
                json::format_error(&format!("{e:#}")).ok()
            } else {
                None
            };
            match rendered {
                Some(body) => println!("{body}"),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays parseable in `--json` mode.
fn init_tracing(verbose: bool) {
    let default = if verbose { "ec2ops_cli=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
