use crate::error::{Error, Result};
use crate::ports::domain_management::DomainManagementPort;
use async_trait::async_trait;
use aws_sdk_opensearch::error::{DisplayErrorContext, SdkError};
use aws_sdk_opensearch::operation::update_domain_config::UpdateDomainConfigError;
use aws_sdk_opensearch::types::AdvancedSecurityOptionsInput;
use aws_sdk_opensearch::Client;
use tracing::info;

const UPDATE_CONTEXT: &str = "domain security configuration update";

/// OpenSearchAdapter implements DomainManagementPort for Amazon OpenSearch Service.
#[derive(Clone)]
pub struct OpenSearchAdapter {
    client: Client,
}

impl OpenSearchAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DomainManagementPort for OpenSearchAdapter {
    async fn enable_internal_user_database(&self, domain_name: &str) -> Result<()> {
        info!(domain_name, "Updating domain config to enable internal database users");

        let options = AdvancedSecurityOptionsInput::builder()
            .internal_user_database_enabled(true)
            .build();

        self.client
            .update_domain_config()
            .domain_name(domain_name)
            .advanced_security_options(options)
            .send()
            .await
            .map_err(update_error)?;
        Ok(())
    }
}

/// A configuration error when the API answered, a dispatch error otherwise.
fn update_error(err: SdkError<UpdateDomainConfigError>) -> Error {
    let message = DisplayErrorContext(&err).to_string();
    match err.raw_response() {
        Some(response) => Error::configuration(UPDATE_CONTEXT, response.status().as_u16(), message),
        None => Error::Dispatch {
            context: UPDATE_CONTEXT.to_string(),
            message,
        },
    }
}
