//! Ports - Trait definitions for everything outside the process.

pub mod domain_api;
#[cfg(feature = "bootstrap")]
pub mod domain_management;
pub mod secrets;
