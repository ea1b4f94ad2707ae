//! opensearch-ops - OpenSearch domain bootstrap and credential rotation
//!
//! Hexagonal Architecture:
//! - domain/: Events, secret payloads and the resources pushed to the domain
//! - ports/: Trait definitions
//! - adapters/: AWS implementations (Secrets Manager, OpenSearch, signed HTTP)
//! - application/: Bootstrap and rotation services
//! - config: Environment configuration
//!
//! # Features
//! - `bootstrap`: custom resource handler (roles, users, index templates, dashboards)
//! - `rotation`: Secrets Manager rotation handler for internal user passwords

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod telemetry;

pub use error::{Error, Result};

#[cfg(feature = "bootstrap")]
pub use config::BootstrapConfig;

#[cfg(feature = "rotation")]
pub use config::RotationConfig;
