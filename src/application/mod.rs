//! Application layer - The two handlers, generic over the ports they use.

// Custom resource handler configuring the domain
#[cfg(feature = "bootstrap")]
pub mod bootstrap;

// Secret rotation handler
#[cfg(feature = "rotation")]
pub mod rotation;

#[cfg(test)]
pub(crate) mod testing;
