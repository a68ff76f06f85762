//! Shared AWS SDK configuration.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use ec2ops_common::DispatcherConfig;

/// Load credentials and region from the default provider chain.
///
/// `region` and `endpoint_url` from the dispatcher configuration take
/// precedence over the environment.
pub async fn load_sdk_config(config: &DispatcherConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    let sdk = loader.load().await;
    tracing::debug!(
        region = ?sdk.region(),
        endpoint_override = config.endpoint_url.is_some(),
        "aws sdk configured",
    );
    sdk
}
