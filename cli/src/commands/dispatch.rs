//! Shared tail of every dispatching command: validate, dispatch, render.

use std::process::ExitCode;

use anyhow::Result;
use ec2ops_common::{Outcome, Response};
use serde_json::Value;

use crate::app::AppContext;
use crate::application::SilentReporter;
use crate::application::services::dispatch::reject;
use crate::domain::Action;
use crate::output::{TerminalReporter, json, render_response};

/// Exit status for an outcome: 0 success, 1 failed, 2 rejected.
#[must_use]
pub const fn exit_status(outcome: Outcome) -> u8 {
    match outcome {
        Outcome::Success => 0,
        Outcome::Failed => 1,
        Outcome::Rejected => 2,
    }
}

/// Dispatch `event` against live AWS services and print the response.
///
/// The event is validated first: a rejection is answered without reading
/// `EC2OPS_*` configuration or loading AWS credentials.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the response cannot
/// be written as JSON.
pub async fn run(app: &AppContext, event: &Value) -> Result<ExitCode> {
    let response = match Action::from_event(event) {
        Ok(action) => {
            let dispatcher = app.dispatcher().await?;
            if app.is_json() {
                dispatcher.handle_action(action, &SilentReporter).await
            } else {
                let reporter = TerminalReporter::new(&app.output);
                dispatcher.handle_action(action, &reporter).await
            }
        }
        Err(rejection) => reject(&rejection),
    };

    emit(app, &response)?;
    Ok(ExitCode::from(exit_status(response.outcome())))
}

fn emit(app: &AppContext, response: &Response) -> Result<()> {
    if app.is_json() {
        println!("{}", json::format_response(response)?);
    } else {
        render_response(&app.output, response);
    }
    Ok(())
}
