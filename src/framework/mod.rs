//! # Framework Layer
//!
//! The generic machinery underneath the host: the module contract and its
//! capability model, the descriptor table and registry, the order spaces,
//! the functionality-injection contract, the error taxonomy, and the test
//! doubles.

pub mod descriptor;
pub mod error;
pub mod injection;
pub mod mock;
pub mod module;
pub mod ordering;

// Re-export core types for convenience
pub use descriptor::{HostingKind, ModuleDescriptor, ModuleRegistry};
pub use error::{HookError, HookResult, ModuleError};
pub use injection::{FunctionalityInjector, IslandId};
pub use module::{
    AssetHooks, BehaviorHooks, BuildHooks, Capabilities, CapabilityId, EngineModule, SceneHooks,
    UnloadHooks,
};
pub use ordering::{ModuleOrders, OrderSpace};
