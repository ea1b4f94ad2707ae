use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainManagementPort: Send + Sync {
    /// Turn on the internal user database of the domain's security plugin
    async fn enable_internal_user_database(&self, domain_name: &str) -> Result<()>;
}
