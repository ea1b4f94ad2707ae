//! In-memory fakes shared by the service tests. Every fake appends to one
//! call log so tests can assert ordering across ports.

use crate::domain::rotation::{SecretMetadata, VersionSelector, VersionStage};
use crate::domain::paths;
use crate::error::{Error, Result};
use crate::ports::domain_api::{DomainApiPort, DomainRequest, DomainResponse};
use crate::ports::secrets::{Lookup, SecretStorePort, SecretValue};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

/// Domain API fake answering 200 unless a failure is registered for a path.
#[derive(Clone)]
pub struct RecordingDomain {
    pub log: CallLog,
    pub requests: Arc<Mutex<Vec<DomainRequest>>>,
    failures: Arc<Mutex<HashMap<String, DomainResponse>>>,
    import_response: String,
}

impl RecordingDomain {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            requests: Arc::default(),
            failures: Arc::default(),
            import_response: serde_json::json!({
                "success": true,
                "successCount": 2,
                "successResults": [
                    { "type": "index-pattern", "id": "spark-task-metrics", "meta": { "title": "spark-task-metrics*" }, "overwrite": true },
                    { "type": "dashboard", "id": "data-skew", "meta": { "title": "Data skew" } }
                ]
            })
            .to_string(),
        }
    }

    pub fn fail(&self, path: &str, status: u16, body: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(path.to_string(), DomainResponse::new(status, body));
    }

    fn respond(&self, path: &str) -> DomainResponse {
        if let Some(failure) = self.failures.lock().unwrap().get(path) {
            return failure.clone();
        }
        if path == paths::SAVED_OBJECTS_IMPORT {
            DomainResponse::new(200, self.import_response.clone())
        } else {
            DomainResponse::new(200, r#"{"status":"OK"}"#)
        }
    }
}

#[async_trait]
impl DomainApiPort for RecordingDomain {
    async fn send(&self, request: DomainRequest) -> Result<DomainResponse> {
        self.log
            .push(format!("{} {}", request.method.as_str(), request.path));
        let response = self.respond(&request.path);
        self.requests.lock().unwrap().push(request);
        Ok(response)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<DomainResponse> {
        self.log.push(format!("AUTH {}:{}", username, password));
        Ok(self.respond(paths::AUTH_INFO))
    }
}

struct StoredVersion {
    secret_string: String,
    stages: Vec<String>,
}

#[derive(Default)]
struct StoredSecret {
    rotation_enabled: bool,
    versions: HashMap<String, StoredVersion>,
}

/// Secret store fake that models version ids and their stage labels.
#[derive(Clone)]
pub struct InMemorySecretStore {
    pub log: CallLog,
    secrets: Arc<Mutex<HashMap<String, StoredSecret>>>,
    next_password: String,
}

impl InMemorySecretStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            secrets: Arc::default(),
            next_password: "Gen3rated-Passw0rd".to_string(),
        }
    }

    pub fn with_version(
        self,
        secret_id: &str,
        version_id: &str,
        secret_string: &str,
        stages: &[VersionStage],
    ) -> Self {
        {
            let mut secrets = self.secrets.lock().unwrap();
            let secret = secrets.entry(secret_id.to_string()).or_insert_with(|| StoredSecret {
                rotation_enabled: true,
                ..Default::default()
            });
            secret.versions.insert(
                version_id.to_string(),
                StoredVersion {
                    secret_string: secret_string.to_string(),
                    stages: stages.iter().map(|s| s.as_str().to_string()).collect(),
                },
            );
        }
        self
    }

    /// Register a version id known to the store but carrying no value yet,
    /// as the scheduler does before calling createSecret.
    pub fn with_stage_only(self, secret_id: &str, version_id: &str, stages: &[VersionStage]) -> Self {
        self.with_version(secret_id, version_id, "", stages)
    }

    pub fn without_rotation(self, secret_id: &str) -> Self {
        if let Some(secret) = self.secrets.lock().unwrap().get_mut(secret_id) {
            secret.rotation_enabled = false;
        }
        self
    }

    pub fn stages(&self, secret_id: &str, version_id: &str) -> Vec<String> {
        self.secrets
            .lock()
            .unwrap()
            .get(secret_id)
            .and_then(|s| s.versions.get(version_id))
            .map(|v| v.stages.clone())
            .unwrap_or_default()
    }

    pub fn value(&self, secret_id: &str, version_id: &str) -> Option<String> {
        self.secrets
            .lock()
            .unwrap()
            .get(secret_id)
            .and_then(|s| s.versions.get(version_id))
            .map(|v| v.secret_string.clone())
    }
}

#[async_trait]
impl SecretStorePort for InMemorySecretStore {
    async fn describe_secret(&self, secret_id: &str) -> Result<SecretMetadata> {
        self.log.push(format!("DESCRIBE {}", secret_id));
        let secrets = self.secrets.lock().unwrap();
        let secret = secrets
            .get(secret_id)
            .ok_or_else(|| Error::secret_access(secret_id, "ResourceNotFoundException"))?;
        Ok(SecretMetadata {
            rotation_enabled: secret.rotation_enabled,
            versions: secret
                .versions
                .iter()
                .map(|(id, v)| (id.clone(), v.stages.clone()))
                .collect(),
        })
    }

    async fn get_secret_value(
        &self,
        secret_id: &str,
        selector: VersionSelector,
    ) -> Result<Lookup<SecretValue>> {
        self.log.push(format!("GET_SECRET {} {:?}", secret_id, selector));
        let secrets = self.secrets.lock().unwrap();
        let Some(secret) = secrets.get(secret_id) else {
            return Ok(Lookup::NotFound);
        };
        let matches = |id: &String, version: &StoredVersion| {
            let has_value = !version.secret_string.is_empty();
            match &selector {
                VersionSelector::Stage(stage) => {
                    has_value && version.stages.iter().any(|s| s == stage.as_str())
                }
                VersionSelector::Version { id: wanted, stage } => {
                    has_value && id == wanted && version.stages.iter().any(|s| s == stage.as_str())
                }
            }
        };
        Ok(secret
            .versions
            .iter()
            .find(|(id, v)| matches(*id, *v))
            .map(|(id, v)| {
                Lookup::Found(SecretValue {
                    version_id: id.clone(),
                    secret_string: v.secret_string.clone(),
                })
            })
            .unwrap_or(Lookup::NotFound))
    }

    async fn put_secret_value(
        &self,
        secret_id: &str,
        token: &str,
        secret_string: &str,
        stage: VersionStage,
    ) -> Result<()> {
        self.log
            .push(format!("PUT_SECRET {} {} {}", secret_id, token, stage));
        let mut secrets = self.secrets.lock().unwrap();
        let secret = secrets.entry(secret_id.to_string()).or_default();
        // A stage label lives on exactly one version.
        for version in secret.versions.values_mut() {
            version.stages.retain(|s| s != stage.as_str());
        }
        secret.versions.insert(
            token.to_string(),
            StoredVersion {
                secret_string: secret_string.to_string(),
                stages: vec![stage.as_str().to_string()],
            },
        );
        Ok(())
    }

    async fn get_random_password(&self, exclude_characters: &str) -> Result<String> {
        self.log.push(format!("RANDOM_PASSWORD {}", exclude_characters));
        Ok(self.next_password.clone())
    }

    async fn promote_to_current(
        &self,
        secret_id: &str,
        to_version: &str,
        from_version: Option<String>,
    ) -> Result<()> {
        self.log.push(format!(
            "PROMOTE {} {} from {:?}",
            secret_id, to_version, from_version
        ));
        let mut secrets = self.secrets.lock().unwrap();
        let secret = secrets
            .get_mut(secret_id)
            .ok_or_else(|| Error::secret_access(secret_id, "ResourceNotFoundException"))?;
        if let Some(from) = from_version {
            if let Some(version) = secret.versions.get_mut(&from) {
                version
                    .stages
                    .retain(|s| s != VersionStage::Current.as_str());
                version.stages.push("AWSPREVIOUS".to_string());
            }
        }
        let version = secret
            .versions
            .get_mut(to_version)
            .ok_or_else(|| Error::secret_access(secret_id, "unknown version"))?;
        version.stages.retain(|s| s != VersionStage::Pending.as_str());
        version.stages.push(VersionStage::Current.as_str().to_string());
        Ok(())
    }
}
