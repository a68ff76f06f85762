//! Systems Manager implementation of the `CommandExecution` port.

use std::fmt::Debug;

use anyhow::{Context, Result, anyhow};
use aws_config::SdkConfig;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::{DisplayErrorContext, SdkError};
use aws_sdk_ssm::operation::get_command_invocation::{
    GetCommandInvocationError, GetCommandInvocationOutput,
};
use aws_sdk_ssm::types::CommandInvocationStatus;
use ec2ops_common::InvocationStatus;

use crate::application::ports::CommandExecution;
use crate::domain::CommandInvocation;

/// Runs shell commands on managed instances via `SendCommand`.
pub struct SsmCommandExecution {
    client: Client,
    document_name: String,
}

impl SsmCommandExecution {
    #[must_use]
    pub fn new(client: Client, document_name: impl Into<String>) -> Self {
        Self {
            client,
            document_name: document_name.into(),
        }
    }

    #[must_use]
    pub fn from_sdk_config(sdk: &SdkConfig, document_name: impl Into<String>) -> Self {
        Self::new(Client::new(sdk), document_name)
    }
}

impl CommandExecution for SsmCommandExecution {
    async fn send_command(&self, instance_id: &str, command: &str) -> Result<String> {
        let output = self
            .client
            .send_command()
            .instance_ids(instance_id)
            .document_name(self.document_name.as_str())
            .parameters("commands", vec![command.to_string()])
            .send()
            .await
            .map_err(|e| anyhow!("{}", DisplayErrorContext(&e)))
            .context("ssm send-command")?;
        output
            .command()
            .and_then(|c| c.command_id())
            .map(str::to_string)
            .context("ssm send-command returned no command id")
    }

    async fn get_invocation(
        &self,
        command_id: &str,
        instance_id: &str,
    ) -> Result<CommandInvocation> {
        let result = self
            .client
            .get_command_invocation()
            .command_id(command_id)
            .instance_id(instance_id)
            .send()
            .await;
        invocation_from(command_id, instance_id, result)
    }
}

/// Map a `GetCommandInvocation` result onto the domain snapshot.
///
/// Freshly submitted commands are briefly unknown to this API, so
/// `InvocationDoesNotExist` reads as `Pending`.
fn invocation_from<R: Debug>(
    command_id: &str,
    instance_id: &str,
    result: Result<GetCommandInvocationOutput, SdkError<GetCommandInvocationError, R>>,
) -> Result<CommandInvocation> {
    let output = match result {
        Ok(output) => output,
        Err(err)
            if err
                .as_service_error()
                .is_some_and(GetCommandInvocationError::is_invocation_does_not_exist) =>
        {
            tracing::debug!(command_id, instance_id, "invocation not registered yet");
            return Ok(CommandInvocation::pending(command_id, instance_id));
        }
        Err(err) => {
            return Err(anyhow!("{}", DisplayErrorContext(&err)))
                .context("ssm get-command-invocation");
        }
    };

    Ok(CommandInvocation {
        command_id: command_id.to_string(),
        instance_id: instance_id.to_string(),
        status: status_of(output.status()),
        stdout: output.standard_output_content().unwrap_or_default().to_string(),
        stderr: output.standard_error_content().unwrap_or_default().to_string(),
    })
}

fn status_of(status: Option<&CommandInvocationStatus>) -> InvocationStatus {
    status.map_or(InvocationStatus::Pending, |s| InvocationStatus::parse(s.as_str()))
}
