use crate::domain::rotation::{SecretMetadata, VersionSelector, VersionStage};
use crate::error::{Error, Result};
use crate::ports::secrets::{Lookup, SecretStorePort, SecretValue};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;
use tracing::{debug, error};

/// SecretsManagerAdapter implements SecretStorePort for AWS Secrets Manager.
#[derive(Clone)]
pub struct SecretsManagerAdapter {
    client: Client,
}

impl SecretsManagerAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the shared config, optionally pointed at a VPC endpoint.
    pub fn from_sdk_config(sdk_config: &SdkConfig, endpoint_url: Option<&str>) -> Self {
        let mut builder = aws_sdk_secretsmanager::config::Builder::from(sdk_config);
        if let Some(url) = endpoint_url {
            builder = builder.endpoint_url(url);
        }
        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl SecretStorePort for SecretsManagerAdapter {
    async fn describe_secret(&self, secret_id: &str) -> Result<SecretMetadata> {
        let resp = self
            .client
            .describe_secret()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| Error::secret_access(secret_id, DisplayErrorContext(e)))?;

        Ok(SecretMetadata {
            rotation_enabled: resp.rotation_enabled().unwrap_or(false),
            versions: resp.version_ids_to_stages().cloned().unwrap_or_default(),
        })
    }

    async fn get_secret_value(
        &self,
        secret_id: &str,
        selector: VersionSelector,
    ) -> Result<Lookup<SecretValue>> {
        let request = self.client.get_secret_value().secret_id(secret_id);
        let request = match &selector {
            VersionSelector::Stage(stage) => request.version_stage(stage.as_str()),
            VersionSelector::Version { id, stage } => {
                request.version_id(id).version_stage(stage.as_str())
            }
        };

        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false);
                if not_found {
                    debug!(secret_id, ?selector, "No secret version matches");
                    return Ok(Lookup::NotFound);
                }
                error!(secret_id, "Failed to get secret: {}", DisplayErrorContext(&err));
                return Err(Error::secret_access(secret_id, DisplayErrorContext(err)));
            }
        };

        let secret_string = match (resp.secret_string(), resp.secret_binary()) {
            (Some(s), _) => s.to_string(),
            (None, Some(blob)) => String::from_utf8(blob.as_ref().to_vec())
                .map_err(|e| Error::secret_access(secret_id, e))?,
            (None, None) => {
                return Err(Error::secret_access(
                    secret_id,
                    "secret version carries no value",
                ))
            }
        };

        Ok(Lookup::Found(SecretValue {
            version_id: resp.version_id().unwrap_or_default().to_string(),
            secret_string,
        }))
    }

    async fn put_secret_value(
        &self,
        secret_id: &str,
        token: &str,
        secret_string: &str,
        stage: VersionStage,
    ) -> Result<()> {
        self.client
            .put_secret_value()
            .secret_id(secret_id)
            .client_request_token(token)
            .secret_string(secret_string)
            .version_stages(stage.as_str())
            .send()
            .await
            .map_err(|e| Error::secret_access(secret_id, DisplayErrorContext(e)))?;
        Ok(())
    }

    async fn get_random_password(&self, exclude_characters: &str) -> Result<String> {
        let resp = self
            .client
            .get_random_password()
            .exclude_characters(exclude_characters)
            .send()
            .await
            .map_err(|e| Error::secret_access("random password", DisplayErrorContext(e)))?;

        resp.random_password()
            .map(str::to_string)
            .ok_or_else(|| Error::secret_access("random password", "empty response"))
    }

    async fn promote_to_current(
        &self,
        secret_id: &str,
        to_version: &str,
        from_version: Option<String>,
    ) -> Result<()> {
        self.client
            .update_secret_version_stage()
            .secret_id(secret_id)
            .version_stage(VersionStage::Current.as_str())
            .move_to_version_id(to_version)
            .set_remove_from_version_id(from_version)
            .send()
            .await
            .map_err(|e| Error::secret_access(secret_id, DisplayErrorContext(e)))?;
        Ok(())
    }
}
