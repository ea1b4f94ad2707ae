use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal user credential stored as a JSON secret string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub username: String,
    pub password: String,
}

impl Secret {
    /// Parse a secret string, attributing failures to `secret_id`.
    pub fn parse(secret_id: &str, secret_string: &str) -> Result<Self> {
        serde_json::from_str(secret_string)
            .map_err(|e| Error::secret_access(secret_id, format!("malformed secret payload: {}", e)))
    }

    pub fn to_secret_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
