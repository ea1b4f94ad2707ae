//! Domain layer - Events, secrets and the payloads pushed to the search domain.

// Custom resource lifecycle events (always available)
pub mod lifecycle;

// API paths on the search domain
pub mod paths;

// Rendered role, user, template and dashboard payloads (bootstrap only)
#[cfg(feature = "bootstrap")]
pub mod resources;

// Rotation events and secret version stages
pub mod rotation;

// Secret payload shape
pub mod secret;
