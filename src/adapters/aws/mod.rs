//! AWS adapters: Secrets Manager, OpenSearch domain management and the
//! SigV4-signed client for the domain's REST API.

#[cfg(feature = "bootstrap")]
pub mod opensearch;
pub mod secrets_manager;
pub mod signed_http;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use std::time::Duration;

/// Load the shared SDK configuration once per cold start.
///
/// SDK retries are disabled: a failed call fails the invocation and the
/// orchestrator decides whether to try again.
pub async fn load_sdk_config(operation_timeout: Duration) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(operation_timeout)
                .build(),
        )
        .retry_config(RetryConfig::disabled())
        .load()
        .await
}
