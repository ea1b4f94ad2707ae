use crate::config::BootstrapConfig;
use crate::domain::lifecycle::{LifecycleEvent, LifecycleResponse, RequestType, SavedObjectRef};
use crate::domain::paths;
use crate::domain::resources::{self, DashboardBundle, InternalUser, DATA_SKEW_DASHBOARD, INDEX_TEMPLATES};
use crate::domain::rotation::{VersionSelector, VersionStage};
use crate::domain::secret::Secret;
use crate::error::{Error, Result};
use crate::ports::domain_api::{DomainApiPort, DomainRequest};
use crate::ports::domain_management::DomainManagementPort;
use crate::ports::secrets::SecretStorePort;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    success: Option<bool>,
    #[serde(default)]
    success_results: Vec<SavedObjectRef>,
}

/// Applies the domain configuration on Create/Update and removes it on Delete.
///
/// Every step is idempotent (PUT, or POST with overwrite), so Update re-applies
/// the full Create sequence and a failed invocation can be retried from scratch.
pub struct BootstrapService<D, M, S> {
    domain: D,
    management: M,
    secrets: S,
    config: BootstrapConfig,
}

impl<D, M, S> BootstrapService<D, M, S>
where
    D: DomainApiPort,
    M: DomainManagementPort,
    S: SecretStorePort,
{
    pub fn new(domain: D, management: M, secrets: S, config: BootstrapConfig) -> Self {
        Self {
            domain,
            management,
            secrets,
            config,
        }
    }

    pub async fn handle(&self, event: &LifecycleEvent) -> Result<LifecycleResponse> {
        let request_type = event.request_type()?;
        info!(
            request_type = %request_type,
            physical_resource_id = ?event.physical_resource_id,
            "Received lifecycle event"
        );

        match request_type {
            RequestType::Create => self.on_create(event).await,
            RequestType::Update => {
                info!(physical_resource_id = ?event.physical_resource_id, "Update re-applies the create sequence");
                self.on_create(event).await
            }
            RequestType::Delete => {
                self.on_delete(event).await?;
                Ok(LifecycleResponse::default())
            }
        }
    }

    async fn on_create(&self, event: &LifecycleEvent) -> Result<LifecycleResponse> {
        info!(properties = ?event.resource_properties, "Creating domain configuration");

        self.put_json(
            "pipeline role creation",
            paths::PIPELINE_ROLE,
            resources::pipeline_role()?,
        )
        .await?;
        self.put_json(
            "pipeline role mapping creation",
            paths::PIPELINE_ROLE_MAPPING,
            resources::pipeline_role_mapping(&self.config.pipeline_role_arn)?,
        )
        .await?;

        self.management
            .enable_internal_user_database(&self.config.domain_name)
            .await?;

        self.create_user(InternalUser::Admin, &self.config.admin_secret_arn)
            .await?;
        self.create_user(InternalUser::ReadOnly, &self.config.user_secret_arn)
            .await?;

        for template in INDEX_TEMPLATES {
            info!(name = template.name, "Creating index template");
            self.put_json(
                &format!("{} index template creation", template.name),
                &paths::index_template(template.name),
                template.body()?,
            )
            .await?;
        }

        let resources = self.import_saved_objects(&DATA_SKEW_DASHBOARD).await?;
        info!(count = resources.len(), "Domain configuration applied");

        Ok(LifecycleResponse::with_resources(resources))
    }

    async fn on_delete(&self, event: &LifecycleEvent) -> Result<()> {
        info!(physical_resource_id = ?event.physical_resource_id, "Deleting domain configuration");

        self.delete(
            "deleting the pipeline role mapping",
            paths::PIPELINE_ROLE_MAPPING.to_string(),
        )
        .await?;
        self.delete("deleting the pipeline role", paths::PIPELINE_ROLE.to_string())
            .await?;

        for secret_arn in [&self.config.admin_secret_arn, &self.config.user_secret_arn] {
            let secret = self.read_secret(secret_arn).await?;
            self.delete(
                &format!("deleting {}", secret_arn),
                paths::internal_user(&secret.username),
            )
            .await?;
        }

        for template in INDEX_TEMPLATES {
            self.delete(
                &format!("deleting {} index template", template.name),
                paths::index_template(template.name),
            )
            .await?;
        }

        for object in event.captured_resources() {
            info!(kind = %object.kind, id = %object.id, "Deleting saved object");
            let (name, value) = paths::DASHBOARDS_XSRF_HEADER;
            self.domain
                .send(DomainRequest::delete(paths::saved_object(&object.kind, &object.id)).header(name, value))
                .await?
                .ensure_success(&format!("deleting {} {} saved object", object.kind, object.id))?;
        }

        Ok(())
    }

    async fn put_json(&self, context: &str, path: &str, body: Value) -> Result<()> {
        self.domain
            .send(DomainRequest::put(path).json(body))
            .await?
            .ensure_success(context)?;
        Ok(())
    }

    async fn delete(&self, context: &str, path: String) -> Result<()> {
        self.domain
            .send(DomainRequest::delete(path))
            .await?
            .ensure_success(context)?;
        Ok(())
    }

    async fn create_user(&self, user: InternalUser, secret_arn: &str) -> Result<()> {
        let secret = self.read_secret(secret_arn).await?;
        info!(username = %secret.username, ?user, "Creating internal user");
        self.put_json(
            &format!("{} creation", secret_arn),
            &paths::internal_user(&secret.username),
            resources::internal_user(user, &secret.password)?,
        )
        .await
    }

    async fn read_secret(&self, secret_arn: &str) -> Result<Secret> {
        let value = self
            .secrets
            .get_secret_value(secret_arn, VersionSelector::Stage(VersionStage::Current))
            .await?
            .found()
            .ok_or_else(|| Error::secret_access(secret_arn, "no AWSCURRENT version"))?;
        Secret::parse(secret_arn, &value.secret_string)
    }

    /// Import a saved-object bundle and return the identities of what was created.
    async fn import_saved_objects(&self, bundle: &DashboardBundle) -> Result<Vec<SavedObjectRef>> {
        info!(file = bundle.file_name, "Creating saved objects");
        let (name, value) = paths::DASHBOARDS_XSRF_HEADER;
        let response = self
            .domain
            .send(
                DomainRequest::post(paths::SAVED_OBJECTS_IMPORT)
                    .header(name, value)
                    .file(bundle.file_name, bundle.content),
            )
            .await?
            .ensure_success("saved objects creation")?;

        let imported: ImportResponse = serde_json::from_str(&response.body)?;
        if imported.success == Some(false) {
            return Err(Error::configuration(
                "saved objects creation",
                response.status,
                response.body,
            ));
        }
        Ok(imported.success_results)
    }
}
