//! Rotation Lambda
//!
//! Secrets Manager rotation function for the domain's internal users. Each
//! invocation runs one of createSecret, setSecret, testSecret or finishSecret.
//!
//! Environment Variables:
//! - AWS_REGION: AWS region, also the SigV4 signing region
//! - DOMAIN_ENDPOINT: domain endpoint host
//! - DOMAIN_NAME: domain name
//! - EXCLUDE_CHARACTERS: characters excluded from generated passwords
//! - SECRETS_MANAGER_ENDPOINT: optional Secrets Manager endpoint override
//! - REQUEST_TIMEOUT_SECS: per-call timeout (default 30)

use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};
use opensearch_ops::adapters::aws::{
    load_sdk_config, secrets_manager::SecretsManagerAdapter, signed_http::SignedDomainClient,
};
use opensearch_ops::application::rotation::RotationService;
use opensearch_ops::domain::rotation::RotationEvent;
use opensearch_ops::{telemetry, RotationConfig};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    telemetry::init();

    let config = RotationConfig::from_env()?;
    let sdk_config = load_sdk_config(config.request_timeout).await;
    info!(domain_name = %config.domain_name, "Rotation function starting");

    // Create adapters
    let secrets = SecretsManagerAdapter::from_sdk_config(
        &sdk_config,
        config.secrets_manager_endpoint.as_deref(),
    );
    let domain = SignedDomainClient::from_sdk_config(
        &config.domain_endpoint,
        config.region.clone(),
        &sdk_config,
        config.request_timeout,
    )?;

    let service = Arc::new(RotationService::new(
        secrets,
        domain,
        config.exclude_characters.clone(),
    ));

    run(service_fn(move |event: LambdaEvent<RotationEvent>| {
        let service = service.clone();
        async move {
            service.handle(&event.payload).await.map_err(|e| {
                error!(error = %e, step = %event.payload.step, "Rotation failed");
                LambdaError::from(e)
            })
        }
    }))
    .await
}
