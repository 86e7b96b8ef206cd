//! Shared AWS SDK configuration.
//!
//! S3, Rekognition and DynamoDB clients are all built from the same `SdkConfig`
//! so region, credentials and retry policy stay consistent across services.

use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Credentials;
use facevault_core::AwsCredentials;

/// Retry policy applied to every AWS client.
pub fn retry_config() -> RetryConfig {
    RetryConfig::standard()
        .with_max_attempts(5)
        .with_retry_mode(RetryMode::Adaptive)
}

/// Load an `SdkConfig` for `region`.
///
/// Explicit credentials take precedence; without them the default provider chain
/// (environment, profile, instance metadata) is used.
pub async fn load_sdk_config(region: &str, credentials: Option<&AwsCredentials>) -> SdkConfig {
    let region_provider =
        RegionProviderChain::first_try(aws_config::Region::new(region.to_string()));

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .retry_config(retry_config());

    if let Some(creds) = credentials {
        tracing::debug!(region = %region, "Using static AWS credentials from configuration");
        loader = loader.credentials_provider(Credentials::new(
            creds.access_key_id.clone(),
            creds.secret_access_key.clone(),
            None,
            None,
            "facevault-config",
        ));
    }

    loader.load().await
}
