use crate::domain::rotation::{SecretMetadata, VersionSelector, VersionStage};
use crate::error::Result;
use async_trait::async_trait;

/// Outcome of a lookup that may legitimately find nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretValue {
    pub version_id: String,
    pub secret_string: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStorePort: Send + Sync {
    /// Rotation flag and version-to-stages map of a secret
    async fn describe_secret(&self, secret_id: &str) -> Result<SecretMetadata>;

    /// Read a secret version, `NotFound` when no version matches the selector
    async fn get_secret_value(
        &self,
        secret_id: &str,
        selector: VersionSelector,
    ) -> Result<Lookup<SecretValue>>;

    /// Store a new version under `token` carrying `stage`
    async fn put_secret_value(
        &self,
        secret_id: &str,
        token: &str,
        secret_string: &str,
        stage: VersionStage,
    ) -> Result<()>;

    async fn get_random_password(&self, exclude_characters: &str) -> Result<String>;

    /// Move AWSCURRENT onto `to_version`, removing it from `from_version` in the same call
    async fn promote_to_current(
        &self,
        secret_id: &str,
        to_version: &str,
        from_version: Option<String>,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_found() {
        let found = Lookup::Found(SecretValue {
            version_id: "v1".to_string(),
            secret_string: "{}".to_string(),
        });
        assert!(found.is_found());
        assert_eq!(found.found().map(|v| v.version_id), Some("v1".to_string()));
        assert_eq!(Lookup::<SecretValue>::NotFound.found(), None);
    }
}
