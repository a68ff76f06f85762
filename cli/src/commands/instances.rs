//! `ec2ops start` / `ec2ops stop`: change the power state of instances.

use clap::Args;
use ec2ops_common::ActionKind;
use serde_json::{Value, json};

/// Arguments shared by the start and stop commands.
#[derive(Args, Debug)]
pub struct InstancesArgs {
    /// Instance IDs, e.g. i-0123456789abcdef0
    #[arg(required = true, value_name = "INSTANCE_ID")]
    pub instance_ids: Vec<String>,
}

/// Event equivalent to the command line.
#[must_use]
pub fn event(kind: ActionKind, args: &InstancesArgs) -> Value {
    json!({
        "action": kind.as_str(),
        "instance_ids": args.instance_ids,
    })
}
