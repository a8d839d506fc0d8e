//! # Functionality Injection
//!
//! The provider/consumer graph itself lives outside the host: a designated
//! module owns one or more isolated partitions ("islands") of providers and
//! consumers. The host only owns the *sequencing*: when providers are
//! collected and registered, and when injection into the loaded set happens
//! relative to the load pipeline. See
//! [`ModuleHost::load_modules`](crate::lifecycle::ModuleHost::load_modules)
//! for the exact ordering guarantees.

use std::fmt;

use crate::framework::error::HookResult;
use crate::framework::module::EngineModule;

/// Opaque identifier for one isolated provider/consumer partition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IslandId(pub u32);

impl fmt::Display for IslandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "island-{}", self.0)
    }
}

/// Contract of the functionality-injection module.
///
/// At most one module in a loaded set exposes this through
/// [`EngineModule::injector`]; its absence is a normal configuration and
/// simply skips the whole injection phase.
///
/// Implementations must be idempotent with respect to registration and
/// injection: the host runs the full pass once during load and a second time
/// right after the first behavior-awake dispatch of the cycle, to catch
/// providers that did not exist at scene-analysis time.
pub trait FunctionalityInjector {
    /// Called once per load cycle before any provider registration.
    fn prepare_load(&mut self) -> HookResult {
        Ok(())
    }

    /// The islands this injector owns.
    fn islands(&self) -> Vec<IslandId>;

    /// The island functionality is injected from.
    fn active_island(&self) -> IslandId;

    /// Registers one provider module into one island.
    fn register_provider(&mut self, island: IslandId, provider: &dyn EngineModule) -> HookResult;

    /// Injects functionality from `island` into one target module.
    fn inject(&mut self, island: IslandId, target: &mut dyn EngineModule) -> HookResult;
}
