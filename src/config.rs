//! Configuration for the two Lambda handlers.
//!
//! Both handlers read everything from the process environment. A `.env` file
//! is honoured for local runs.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Characters excluded from generated passwords unless `EXCLUDE_CHARACTERS` is set.
pub const DEFAULT_EXCLUDE_CHARACTERS: &str = "/@\"'\\";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} env var required")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Configuration for the bootstrap custom resource handler.
#[cfg(feature = "bootstrap")]
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    /// Domain endpoint, bare host or full URL
    pub domain_endpoint: String,
    /// Name of the managed domain
    pub domain_name: String,
    /// Signing region
    pub region: String,
    /// IAM role mapped onto the pipeline security role
    pub pipeline_role_arn: String,
    /// Secret holding the dashboard admin credential
    pub admin_secret_arn: String,
    /// Secret holding the read-only dashboard credential
    pub user_secret_arn: String,
    /// Timeout applied to every outbound call
    pub request_timeout: Duration,
}

#[cfg(feature = "bootstrap")]
impl BootstrapConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Self {
            domain_endpoint: required("DOMAIN_ENDPOINT")?,
            domain_name: required("DOMAIN_NAME")?,
            region: required("AWS_REGION")?,
            pipeline_role_arn: required("PIPELINE_ROLE_ARN")?,
            admin_secret_arn: required("ADMIN_SECRET_ARN")?,
            user_secret_arn: required("USER_SECRET_ARN")?,
            request_timeout: request_timeout()?,
        })
    }
}

/// Configuration for the secret rotation handler.
#[cfg(feature = "rotation")]
#[derive(Clone, Debug)]
pub struct RotationConfig {
    /// Domain endpoint, bare host or full URL
    pub domain_endpoint: String,
    /// Name of the managed domain
    pub domain_name: String,
    /// Signing region
    pub region: String,
    /// Characters never used in generated passwords
    pub exclude_characters: String,
    /// Secrets Manager endpoint override (VPC endpoint)
    pub secrets_manager_endpoint: Option<String>,
    /// Timeout applied to every outbound call
    pub request_timeout: Duration,
}

#[cfg(feature = "rotation")]
impl RotationConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Self {
            domain_endpoint: required("DOMAIN_ENDPOINT")?,
            domain_name: required("DOMAIN_NAME")?,
            region: required("AWS_REGION")?,
            exclude_characters: env::var("EXCLUDE_CHARACTERS")
                .unwrap_or_else(|_| String::from(DEFAULT_EXCLUDE_CHARACTERS)),
            secrets_manager_endpoint: env::var("SECRETS_MANAGER_ENDPOINT")
                .ok()
                .filter(|s| !s.is_empty()),
            request_timeout: request_timeout()?,
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn request_timeout() -> Result<Duration, ConfigError> {
    match env::var("REQUEST_TIMEOUT_SECS") {
        Ok(value) => parse_timeout(&value),
        Err(_) => Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            var: "REQUEST_TIMEOUT_SECS",
            value: value.to_string(),
        }),
    }
}

/// Turn a configured endpoint into a base URL, prefixing `https://` for bare hosts.
pub fn endpoint_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // The environment is process-wide; tests touching it take this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ROTATION_VARS: [(&str, &str); 3] = [
        ("DOMAIN_ENDPOINT", "search-logs-abc.eu-west-1.es.amazonaws.com"),
        ("DOMAIN_NAME", "spark-logs"),
        ("AWS_REGION", "eu-west-1"),
    ];

    fn set_rotation_env() {
        for (var, value) in ROTATION_VARS {
            env::set_var(var, value);
        }
        for var in ["EXCLUDE_CHARACTERS", "SECRETS_MANAGER_ENDPOINT", "REQUEST_TIMEOUT_SECS"] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_endpoint_url_prefixes_bare_host() {
        assert_eq!(
            endpoint_url("search-logs-abc.eu-west-1.es.amazonaws.com"),
            "https://search-logs-abc.eu-west-1.es.amazonaws.com"
        );
        assert_eq!(endpoint_url("http://127.0.0.1:9200/"), "http://127.0.0.1:9200");
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("45"), Ok(Duration::from_secs(45)));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }

    #[cfg(feature = "rotation")]
    #[test]
    fn test_rotation_config_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_rotation_env();
        env::set_var("SECRETS_MANAGER_ENDPOINT", "");

        let config = RotationConfig::from_env().unwrap();

        assert_eq!(config.domain_name, "spark-logs");
        assert_eq!(config.exclude_characters, DEFAULT_EXCLUDE_CHARACTERS);
        assert_eq!(config.secrets_manager_endpoint, None);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    }

    #[cfg(feature = "rotation")]
    #[test]
    fn test_rotation_config_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_rotation_env();
        env::set_var("EXCLUDE_CHARACTERS", ":");
        env::set_var("SECRETS_MANAGER_ENDPOINT", "https://vpce-1.secretsmanager.eu-west-1.vpce.amazonaws.com");
        env::set_var("REQUEST_TIMEOUT_SECS", "5");

        let config = RotationConfig::from_env().unwrap();
        set_rotation_env();

        assert_eq!(config.exclude_characters, ":");
        assert_eq!(
            config.secrets_manager_endpoint.as_deref(),
            Some("https://vpce-1.secretsmanager.eu-west-1.vpce.amazonaws.com")
        );
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[cfg(feature = "rotation")]
    #[test]
    fn test_missing_endpoint_is_reported() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_rotation_env();
        env::remove_var("DOMAIN_ENDPOINT");

        let err = RotationConfig::from_env().unwrap_err();
        set_rotation_env();

        assert_eq!(err, ConfigError::Missing("DOMAIN_ENDPOINT"));
    }

    #[cfg(feature = "rotation")]
    #[test]
    fn test_malformed_timeout_is_reported() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_rotation_env();
        env::set_var("REQUEST_TIMEOUT_SECS", "abc");

        let err = RotationConfig::from_env().unwrap_err();
        set_rotation_env();

        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS",
                value: "abc".to_string(),
            }
        );
    }

    #[cfg(feature = "bootstrap")]
    #[test]
    fn test_bootstrap_config_requires_secret_arns() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_rotation_env();
        env::set_var("PIPELINE_ROLE_ARN", "arn:aws:iam::123456789012:role/pipeline");
        env::set_var("ADMIN_SECRET_ARN", "arn:aws:secretsmanager:eu-west-1:123456789012:secret:admin");
        env::remove_var("USER_SECRET_ARN");

        assert_eq!(
            BootstrapConfig::from_env().unwrap_err(),
            ConfigError::Missing("USER_SECRET_ARN")
        );

        env::set_var("USER_SECRET_ARN", "arn:aws:secretsmanager:eu-west-1:123456789012:secret:user");
        let config = BootstrapConfig::from_env().unwrap();
        assert_eq!(config.pipeline_role_arn, "arn:aws:iam::123456789012:role/pipeline");
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    }
}
