use crate::domain::paths;
use crate::domain::rotation::{
    RotationEvent, RotationStep, SecretMetadata, VersionSelector, VersionStage,
};
use crate::domain::secret::Secret;
use crate::error::{Error, Result};
use crate::ports::domain_api::{DomainApiPort, DomainRequest};
use crate::ports::secrets::SecretStorePort;
use serde_json::json;
use tracing::{error, info};

/// Four-step rotation of an internal user password.
///
/// No state is kept between invocations: the stage labels held by the secret
/// store decide what each step does.
pub struct RotationService<S, D> {
    secrets: S,
    domain: D,
    exclude_characters: String,
}

impl<S, D> RotationService<S, D>
where
    S: SecretStorePort,
    D: DomainApiPort,
{
    pub fn new(secrets: S, domain: D, exclude_characters: impl Into<String>) -> Self {
        Self {
            secrets,
            domain,
            exclude_characters: exclude_characters.into(),
        }
    }

    pub async fn handle(&self, event: &RotationEvent) -> Result<()> {
        let step = event.step()?;
        let arn = event.secret_id.as_str();
        let token = event.client_request_token.as_str();
        info!(step = %step, secret_id = arn, version = token, "Received rotation event");

        let metadata = self.secrets.describe_secret(arn).await?;
        if !metadata.rotation_enabled {
            error!(secret_id = arn, "Secret is not enabled for rotation");
            return Err(Error::InvalidRotationState(format!(
                "Secret {} is not enabled for rotation",
                arn
            )));
        }
        if metadata.stages_of(token).is_none() {
            error!(secret_id = arn, version = token, "Secret version has no stage for rotation");
            return Err(Error::InvalidRotationState(format!(
                "Secret version {} has no stage for rotation of secret {}",
                token, arn
            )));
        }
        if metadata.has_stage(token, VersionStage::Current) {
            info!(secret_id = arn, version = token, "Secret version already set as AWSCURRENT");
            return Ok(());
        }
        if !metadata.has_stage(token, VersionStage::Pending) {
            error!(secret_id = arn, version = token, "Secret version not set as AWSPENDING");
            return Err(Error::InvalidRotationState(format!(
                "Secret version {} not set as AWSPENDING for rotation of secret {}",
                token, arn
            )));
        }

        match step {
            RotationStep::CreateSecret => self.create_secret(arn, token).await,
            RotationStep::SetSecret => self.set_secret(arn, token).await,
            RotationStep::TestSecret => self.test_secret(arn, token).await,
            RotationStep::FinishSecret => self.finish_secret(arn, token, &metadata).await,
        }
    }

    /// Generate and store a pending password unless one already exists for `token`.
    async fn create_secret(&self, arn: &str, token: &str) -> Result<()> {
        let current = self
            .require_secret(arn, VersionSelector::Stage(VersionStage::Current))
            .await?;

        let pending = self
            .secrets
            .get_secret_value(arn, pending_version(token))
            .await?;
        if pending.is_found() {
            info!(secret_id = arn, version = token, "createSecret: Successfully retrieved secret");
            return Ok(());
        }

        let password = self
            .secrets
            .get_random_password(&self.exclude_characters)
            .await?;
        let secret = Secret {
            username: current.username,
            password,
        };
        self.secrets
            .put_secret_value(arn, token, &secret.to_secret_string()?, VersionStage::Pending)
            .await?;
        info!(secret_id = arn, version = token, "createSecret: Successfully put secret");
        Ok(())
    }

    /// Push the pending password to the domain's internal user.
    async fn set_secret(&self, arn: &str, token: &str) -> Result<()> {
        let pending = self.require_secret(arn, pending_version(token)).await?;
        let patch = json!([
            { "op": "replace", "path": "/password", "value": pending.password }
        ]);

        self.domain
            .send(DomainRequest::patch(paths::internal_user(&pending.username)).json(patch))
            .await?
            .ensure_success(&format!("rotation {} password", pending.username))?;
        info!(secret_id = arn, username = %pending.username, "setSecret: Password updated");
        Ok(())
    }

    /// Check the pending credential authenticates against the domain.
    async fn test_secret(&self, arn: &str, token: &str) -> Result<()> {
        let pending = self.require_secret(arn, pending_version(token)).await?;

        self.domain
            .authenticate(&pending.username, &pending.password)
            .await?
            .ensure_success(&format!("authentication test of {}", pending.username))?;
        info!(secret_id = arn, username = %pending.username, "testSecret: Pending credential authenticated");
        Ok(())
    }

    /// Move AWSCURRENT onto `token`.
    async fn finish_secret(&self, arn: &str, token: &str, metadata: &SecretMetadata) -> Result<()> {
        let current = metadata.current_version();
        if current == Some(token) {
            info!(secret_id = arn, version = token, "finishSecret: Version already marked as AWSCURRENT");
            return Ok(());
        }

        self.secrets
            .promote_to_current(arn, token, current.map(str::to_string))
            .await?;
        info!(secret_id = arn, version = token, "finishSecret: Successfully set AWSCURRENT stage");
        Ok(())
    }

    async fn require_secret(&self, arn: &str, selector: VersionSelector) -> Result<Secret> {
        let description = format!("{:?}", selector);
        let value = self
            .secrets
            .get_secret_value(arn, selector)
            .await?
            .found()
            .ok_or_else(|| {
                Error::secret_access(arn, format!("no secret version matches {}", description))
            })?;
        Secret::parse(arn, &value.secret_string)
    }
}

fn pending_version(token: &str) -> VersionSelector {
    VersionSelector::Version {
        id: token.to_string(),
        stage: VersionStage::Pending,
    }
}
