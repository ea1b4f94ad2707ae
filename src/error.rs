//! Error taxonomy shared by both handlers.
//!
//! Nothing is retried locally: every error aborts the invocation and is
//! reported to the orchestrator that owns the retry policy.

use crate::config::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Non-success response from the domain or the domain management API.
    #[error("Error {status} in {context}: {body}")]
    Configuration {
        context: String,
        status: u16,
        body: String,
    },

    #[error("Failed to access secret {secret_id}: {message}")]
    SecretAccess { secret_id: String, message: String },

    #[error("Invalid rotation state: {0}")]
    InvalidRotationState(String),

    #[error("Invalid request type: {0}")]
    UnsupportedRequestType(String),

    #[error("Invalid step parameter: {0}")]
    UnsupportedStep(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// An SDK call that failed before any HTTP response came back.
    #[error("Request failed in {context}: {message}")]
    Dispatch { context: String, message: String },

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub fn configuration(context: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Error::Configuration {
            context: context.into(),
            status,
            body: body.into(),
        }
    }

    pub fn secret_access(secret_id: impl Into<String>, message: impl ToString) -> Self {
        Error::SecretAccess {
            secret_id: secret_id.into(),
            message: message.to_string(),
        }
    }

    /// HTTP status carried by a configuration error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Configuration { status, .. } => Some(*status),
            _ => None,
        }
    }
}
