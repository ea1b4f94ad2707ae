//! Bootstrap Lambda
//!
//! Backs the custom resource that configures the OpenSearch domain:
//! pipeline role and mapping, internal users, index templates and dashboards.
//!
//! Environment Variables:
//! - AWS_REGION: AWS region, also the SigV4 signing region
//! - DOMAIN_ENDPOINT: domain endpoint host
//! - DOMAIN_NAME: domain name
//! - PIPELINE_ROLE_ARN: IAM role of the ingestion pipeline
//! - ADMIN_SECRET_ARN / USER_SECRET_ARN: internal user credentials
//! - REQUEST_TIMEOUT_SECS: per-call timeout (default 30)

use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};
use opensearch_ops::adapters::aws::{
    load_sdk_config, opensearch::OpenSearchAdapter, secrets_manager::SecretsManagerAdapter,
    signed_http::SignedDomainClient,
};
use opensearch_ops::application::bootstrap::BootstrapService;
use opensearch_ops::domain::lifecycle::LifecycleEvent;
use opensearch_ops::{telemetry, BootstrapConfig};
use std::sync::Arc;
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    telemetry::init();

    let config = BootstrapConfig::from_env()?;
    let sdk_config = load_sdk_config(config.request_timeout).await;

    // Create adapters
    let domain = SignedDomainClient::from_sdk_config(
        &config.domain_endpoint,
        config.region.clone(),
        &sdk_config,
        config.request_timeout,
    )?;
    let management = OpenSearchAdapter::new(aws_sdk_opensearch::Client::new(&sdk_config));
    let secrets = SecretsManagerAdapter::new(aws_sdk_secretsmanager::Client::new(&sdk_config));

    let service = Arc::new(BootstrapService::new(domain, management, secrets, config));

    run(service_fn(move |event: LambdaEvent<LifecycleEvent>| {
        let service = service.clone();
        async move {
            service.handle(&event.payload).await.map_err(|e| {
                error!(error = %e, "Bootstrap failed");
                LambdaError::from(e)
            })
        }
    }))
    .await
}
