//! # Framework Errors
//!
//! This module defines the common error types used throughout the module
//! framework. By centralizing error definitions, we ensure consistent error
//! handling across the host, the registry, and every dispatch site.

use crate::framework::module::CapabilityId;

/// Boxed error returned by module hooks.
///
/// Modules define their own error types; the host only needs `Display` to log
/// a failed hook and move on to the next subscriber.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for module hooks. Defaults to `()` for the fire-and-forget
/// callbacks; filtering and aggregating hooks substitute their payload type.
pub type HookResult<T = ()> = Result<T, HookError>;

/// Errors that can occur within the module framework itself.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("module construction produced no instance: {0}")]
    Construction(&'static str),
    #[error("module registry already contains {0}")]
    DuplicateModule(&'static str),
    #[error("dependency connection {consumer} -> {capability} failed: {cause}")]
    Connection {
        consumer: &'static str,
        capability: CapabilityId,
        cause: HookError,
    },
}
