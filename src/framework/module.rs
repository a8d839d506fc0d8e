//! # EngineModule Trait
//!
//! The `EngineModule` trait defines the contract that every module must
//! implement to be managed by the [`ModuleHost`](crate::lifecycle::ModuleHost).
//! A module opts into lifecycle callback categories by overriding the
//! matching capability accessor to return `Some(self)`; everything defaults
//! to "not subscribed".
//!
//! # Architecture Note
//! Why accessors instead of downcasts? The host never probes a module with
//! runtime casts per event. Each accessor is queried exactly once, when the
//! module is constructed, and the answers are cached as [`Capabilities`]
//! flags. Capability membership therefore cannot change after construction:
//! a module appears in a category's dispatch list iff its accessor returned
//! `Some` at load time.
//!
//! # Provided Methods (Hooks)
//! Every accessor and declaration method has a default implementation, so a
//! minimal module only implements the `Any` plumbing:
//! - [`EngineModule::load`], fired once per load cycle, after dependency
//!   wiring and functionality injection.
//! - [`EngineModule::connect_dependency`], fired once per resolved
//!   dependency edge.
//!
//! The per-category hook traits ([`BehaviorHooks`], [`SceneHooks`],
//! [`BuildHooks`], [`AssetHooks`], [`UnloadHooks`]) also default every hook
//! to a no-op, so subscribers override only the events they care about.

use std::any::Any;
use std::fmt;

use crate::engine::{BuildInfo, DeleteOptions, DeleteOutcome, SceneOpenMode, SceneRef};
use crate::framework::error::HookResult;
use crate::framework::injection::FunctionalityInjector;

/// Identifies one functionality a module can provide to, or consume from,
/// other modules in the loaded set.
///
/// Capability ids are explicit tags, not reflected interface types: a
/// consumer declares the ids it depends on, a provider declares the ids it
/// satisfies, and the wiring pass matches them by equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CapabilityId(pub &'static str);

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Trait that any module must implement to be managed by the host.
///
/// # Identity
/// A module's identity is the fully-qualified type name carried by its
/// descriptor; the trait itself only supplies the `Any` plumbing the query
/// surface needs for `get_module::<T>()`.
pub trait EngineModule: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Called once per load cycle, after dependency wiring and functionality
    /// injection, in load order. A failing load hook is logged and does not
    /// abort the load of the remaining modules.
    fn load(&mut self) -> HookResult {
        Ok(())
    }

    // --- Capability accessors (queried once, at construction) ---

    fn unload_hooks(&mut self) -> Option<&mut dyn UnloadHooks> {
        None
    }

    fn behavior_hooks(&mut self) -> Option<&mut dyn BehaviorHooks> {
        None
    }

    fn scene_hooks(&mut self) -> Option<&mut dyn SceneHooks> {
        None
    }

    fn build_hooks(&mut self) -> Option<&mut dyn BuildHooks> {
        None
    }

    fn asset_hooks(&mut self) -> Option<&mut dyn AssetHooks> {
        None
    }

    /// The functionality-injection module of the loaded set, if this is it.
    fn injector(&mut self) -> Option<&mut dyn FunctionalityInjector> {
        None
    }

    // --- Declarations ---

    /// Capability ids this module satisfies for dependency wiring.
    fn provides(&self) -> &[CapabilityId] {
        &[]
    }

    /// Capability ids this module depends on. For every declared id and
    /// every other loaded module providing it, the host invokes
    /// [`EngineModule::connect_dependency`] once.
    fn dependencies(&self) -> &[CapabilityId] {
        &[]
    }

    /// Whether this module is registered as a functionality provider with
    /// the injection module.
    fn is_functionality_provider(&self) -> bool {
        false
    }

    /// Invoked once per resolved dependency edge, passing the provider
    /// instance. When several providers satisfy the same capability the
    /// hook fires once per provider; a consumer storing a single reference
    /// keeps the last successful call.
    fn connect_dependency(
        &mut self,
        capability: CapabilityId,
        provider: &dyn EngineModule,
    ) -> HookResult {
        let _ = (capability, provider);
        Ok(())
    }
}

/// Unload hook, fired in unload order during teardown.
pub trait UnloadHooks {
    fn unload(&mut self) -> HookResult;
}

/// Engine behavior callbacks, forwarded from the host's update loop.
pub trait BehaviorHooks {
    fn awake(&mut self) -> HookResult {
        Ok(())
    }

    fn enable(&mut self) -> HookResult {
        Ok(())
    }

    fn start(&mut self) -> HookResult {
        Ok(())
    }

    fn update(&mut self) -> HookResult {
        Ok(())
    }

    fn disable(&mut self) -> HookResult {
        Ok(())
    }

    fn destroy(&mut self) -> HookResult {
        Ok(())
    }
}

/// Scene transition callbacks.
pub trait SceneHooks {
    fn scene_opening(&mut self, _path: &str, _mode: SceneOpenMode) -> HookResult {
        Ok(())
    }

    fn scene_opened(&mut self, _scene: &SceneRef, _mode: SceneOpenMode) -> HookResult {
        Ok(())
    }

    fn scene_loaded(&mut self, _scene: &SceneRef) -> HookResult {
        Ok(())
    }

    fn scene_unloaded(&mut self, _scene: &SceneRef) -> HookResult {
        Ok(())
    }

    fn active_scene_changed(&mut self, _previous: &SceneRef, _current: &SceneRef) -> HookResult {
        Ok(())
    }

    fn new_scene_created(&mut self, _scene: &SceneRef, _mode: SceneOpenMode) -> HookResult {
        Ok(())
    }
}

/// Player build callbacks.
pub trait BuildHooks {
    fn pre_process(&mut self, _build: &BuildInfo) -> HookResult {
        Ok(())
    }

    fn process_scene(&mut self, _scene: &SceneRef, _build: &BuildInfo) -> HookResult {
        Ok(())
    }

    fn post_process(&mut self, _build: &BuildInfo) -> HookResult {
        Ok(())
    }
}

/// Asset pipeline interception callbacks.
pub trait AssetHooks {
    fn will_create(&mut self, _path: &str) -> HookResult {
        Ok(())
    }

    /// Receives the pending save list and returns the (possibly filtered)
    /// list to carry forward. A failing subscriber leaves the list
    /// unchanged for the next one.
    fn will_save(&mut self, paths: Vec<String>) -> HookResult<Vec<String>> {
        Ok(paths)
    }

    /// Decides whether this module handled the deletion itself. Any
    /// subscriber answering [`DeleteOutcome::DidDelete`] flips the
    /// aggregate result.
    fn will_delete(&mut self, _path: &str, _options: DeleteOptions) -> HookResult<DeleteOutcome> {
        Ok(DeleteOutcome::DidNotDelete)
    }
}

/// Capability flags for one loaded module, computed once at construction by
/// probing the accessors, then cached for the lifetime of the loaded set.
#[derive(Clone, Copy, Default, Debug)]
pub struct Capabilities {
    pub unload: bool,
    pub behavior: bool,
    pub scene: bool,
    pub build: bool,
    pub asset: bool,
    pub injector: bool,
    pub provider: bool,
}

impl Capabilities {
    pub fn probe(module: &mut dyn EngineModule) -> Self {
        Self {
            unload: module.unload_hooks().is_some(),
            behavior: module.behavior_hooks().is_some(),
            scene: module.scene_hooks().is_some(),
            build: module.build_hooks().is_some(),
            asset: module.asset_hooks().is_some(),
            injector: module.injector().is_some(),
            provider: module.is_functionality_provider(),
        }
    }
}
