//! EC2 implementation of the `ComputeControl` port.

use anyhow::{Context, Result, anyhow};
use aws_config::SdkConfig;
use aws_sdk_ec2::Client;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::{InstanceState, InstanceStateChange as Ec2StateChange};
use ec2ops_common::InstanceStateChange;

use crate::application::ports::ComputeControl;

/// Starts and stops instances through the EC2 API.
pub struct Ec2Compute {
    client: Client,
}

impl Ec2Compute {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn from_sdk_config(sdk: &SdkConfig) -> Self {
        Self::new(Client::new(sdk))
    }
}

impl ComputeControl for Ec2Compute {
    async fn start_instances(&self, instance_ids: &[String]) -> Result<Vec<InstanceStateChange>> {
        let output = self
            .client
            .start_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(|e| anyhow!("{}", DisplayErrorContext(&e)))
            .context("ec2 start-instances")?;
        Ok(output.starting_instances().iter().map(convert).collect())
    }

    async fn stop_instances(&self, instance_ids: &[String]) -> Result<Vec<InstanceStateChange>> {
        let output = self
            .client
            .stop_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(|e| anyhow!("{}", DisplayErrorContext(&e)))
            .context("ec2 stop-instances")?;
        Ok(output.stopping_instances().iter().map(convert).collect())
    }
}

fn convert(change: &Ec2StateChange) -> InstanceStateChange {
    InstanceStateChange {
        instance_id: change.instance_id().unwrap_or_default().to_string(),
        previous_state: state_name(change.previous_state()),
        current_state: state_name(change.current_state()),
    }
}

fn state_name(state: Option<&InstanceState>) -> Option<String> {
    state
        .and_then(InstanceState::name)
        .map(|name| name.as_str().to_string())
}
