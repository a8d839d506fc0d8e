//! # Mock Framework & Testing Guide
//!
//! Test doubles for exercising the host without a real engine: a
//! configurable probe module, a recording scene graph, and an in-memory
//! settings source. All of them write into one shared journal, so a test
//! can assert the *interleaving* of host actions (construction, wiring,
//! injection, hooks, node activation) as a single ordered sequence.
//!
//! ## When to use Probes vs Real Modules
//!
//! | Feature | ProbeModule | Real Module |
//! |---------|-------------|-------------|
//! | **Speed** | Instant (in-memory) | Depends on the module |
//! | **Determinism** | 100% deterministic | Subject to module state |
//! | **Observability** | Full journal of every hook | Whatever the module logs |
//! | **Error Injection** | Easy (`failing_in`) | Hard (requires specific state) |
//! | **Use Case** | Testing the host itself | Testing the module |
//!
//! ## The Journal
//!
//! Every observable action appends one line:
//!
//! ```text
//! audio:construct            probe constructed (":construct+settings" when a
//!                            persisted blob was supplied)
//! mixer:connect:audio:dsp    dependency edge connected on `mixer`
//! inj:prepare_load           injector pre-load hook
//! inj:register:island-0:dsp  provider registration
//! inj:inject:island-0:audio  functionality injection into one target
//! audio:load                 load hook
//! scene:activate:node-2      scene-node activation
//! audio:awake                behavior dispatch
//! audio:unload               teardown
//! scene:destroy:node-2       scene-node destruction
//! ```
//!
//! ## Failure Injection
//!
//! `ProbeBuilder::failing_in("update")` makes the probe record the hook and
//! then return an error, which is exactly what a throwing module looks like
//! to the host. Tests use this to verify per-subscriber failure isolation.
//!
//! ## Example
//!
//! ```rust
//! use module_host::framework::mock::{new_journal, ProbeBuilder};
//! use module_host::framework::ModuleRegistry;
//! use module_host::lifecycle::settings::{ModuleConfig, Platform, RuntimeMode};
//! use module_host::lifecycle::ModuleHost;
//!
//! let journal = new_journal();
//! let mut registry = ModuleRegistry::new();
//! registry
//!     .register(
//!         ProbeBuilder::new("audio", &journal)
//!             .with_behavior_hooks()
//!             .descriptor(),
//!     )
//!     .unwrap();
//!
//! let mut host = ModuleHost::new(
//!     registry,
//!     ModuleConfig::default(),
//!     Platform::Linux,
//!     RuntimeMode::Editor,
//! );
//! host.load_modules();
//! host.behavior_update();
//!
//! let entries = journal.borrow().clone();
//! assert!(entries.contains(&"audio:update".to_string()));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::engine::{
    BuildInfo, DeleteOptions, DeleteOutcome, NodeId, SceneGraph, SceneOpenMode, SceneRef,
    SettingsSource,
};
use crate::framework::descriptor::{HostingKind, ModuleDescriptor};
use crate::framework::error::HookResult;
use crate::framework::injection::{FunctionalityInjector, IslandId};
use crate::framework::module::{
    AssetHooks, BehaviorHooks, BuildHooks, CapabilityId, EngineModule, SceneHooks, UnloadHooks,
};
use crate::framework::ordering::ModuleOrders;

// =============================================================================
// JOURNAL
// =============================================================================

/// Shared, ordered record of everything the test doubles observed. The host
/// is single-threaded, so a plain `Rc<RefCell<_>>` is all the sharing the
/// doubles need.
pub type ProbeJournal = Rc<RefCell<Vec<String>>>;

pub fn new_journal() -> ProbeJournal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Snapshot of the journal contents.
pub fn journal_entries(journal: &ProbeJournal) -> Vec<String> {
    journal.borrow().clone()
}

/// Error returned by a probe hook configured to fail.
#[derive(Debug, thiserror::Error)]
#[error("probe failure injected in {module}:{hook}")]
pub struct ProbeError {
    pub module: &'static str,
    pub hook: &'static str,
}

// =============================================================================
// PROBE BUILDER
// =============================================================================

#[derive(Clone, Copy, Default)]
struct ProbeCaps {
    unload: bool,
    behavior: bool,
    scene: bool,
    build: bool,
    asset: bool,
}

macro_rules! probe_cap_builders {
    ($($cap:ident),+ $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Subscribes the probe to the `", stringify!($cap), "` callback category.")]
                pub fn [<with_ $cap _hooks>](mut self) -> Self {
                    self.caps.$cap = true;
                    self
                }
            )+
        }
    };
}

macro_rules! probe_touch_hooks {
    ($($hook:ident),+ $(,)?) => {
        $(
            fn $hook(&mut self) -> HookResult {
                self.touch(stringify!($hook))
            }
        )+
    };
}

/// Template for one probe registration. Cloned into the descriptor's
/// constructor thunk, so every load cycle builds a fresh probe from the same
/// configuration, exactly like a real module type.
#[derive(Clone)]
pub struct ProbeBuilder {
    name: &'static str,
    journal: ProbeJournal,
    caps: ProbeCaps,
    hosting: HostingKind,
    orders: ModuleOrders,
    failing: Vec<&'static str>,
    provides: Vec<CapabilityId>,
    dependencies: Vec<CapabilityId>,
    provider: bool,
    delete_outcome: DeleteOutcome,
    drop_saved_containing: Option<&'static str>,
    construct_none: bool,
}

impl ProbeBuilder {
    pub fn new(name: &'static str, journal: &ProbeJournal) -> Self {
        Self {
            name,
            journal: journal.clone(),
            caps: ProbeCaps::default(),
            hosting: HostingKind::Plain,
            orders: ModuleOrders::default(),
            failing: Vec::new(),
            provides: Vec::new(),
            dependencies: Vec::new(),
            provider: false,
            delete_outcome: DeleteOutcome::DidNotDelete,
            drop_saved_containing: None,
            construct_none: false,
        }
    }

    probe_cap_builders!(unload, behavior, scene, build, asset);

    pub fn hosted(mut self, hosting: HostingKind) -> Self {
        self.hosting = hosting;
        self
    }

    pub fn orders(mut self, orders: ModuleOrders) -> Self {
        self.orders = orders;
        self
    }

    /// Makes the named hook record itself and then fail.
    pub fn failing_in(mut self, hook: &'static str) -> Self {
        self.failing.push(hook);
        self
    }

    pub fn provides(mut self, capability: CapabilityId) -> Self {
        self.provides.push(capability);
        self
    }

    pub fn depends_on(mut self, capability: CapabilityId) -> Self {
        self.dependencies.push(capability);
        self
    }

    /// Marks the probe as a functionality provider.
    pub fn functionality_provider(mut self) -> Self {
        self.provider = true;
        self
    }

    /// Makes the probe answer `DidDelete` to asset-delete interceptions.
    pub fn deletes_assets(mut self) -> Self {
        self.delete_outcome = DeleteOutcome::DidDelete;
        self
    }

    /// Makes `will_save` drop every path containing `fragment`.
    pub fn drops_saved_paths_containing(mut self, fragment: &'static str) -> Self {
        self.drop_saved_containing = Some(fragment);
        self
    }

    /// Makes construction yield no instance, like a module type whose
    /// factory fails.
    pub fn failing_construction(mut self) -> Self {
        self.construct_none = true;
        self
    }

    pub fn descriptor(&self) -> ModuleDescriptor {
        let template = self.clone();
        ModuleDescriptor::new(self.name, move |persisted| {
            if template.construct_none {
                template
                    .journal
                    .borrow_mut()
                    .push(format!("{}:construct-failed", template.name));
                return None;
            }
            template.journal.borrow_mut().push(match persisted {
                Some(_) => format!("{}:construct+settings", template.name),
                None => format!("{}:construct", template.name),
            });
            Some(Box::new(ProbeModule::from_builder(
                template.clone(),
                persisted,
            )))
        })
        .hosted(self.hosting)
        .orders(self.orders)
    }
}

// =============================================================================
// PROBE MODULE
// =============================================================================

/// A module whose only behavior is recording every hook the host fires at
/// it, with optional per-hook failure injection.
pub struct ProbeModule {
    name: &'static str,
    journal: ProbeJournal,
    caps: ProbeCaps,
    failing: Vec<&'static str>,
    provides: Vec<CapabilityId>,
    dependencies: Vec<CapabilityId>,
    provider: bool,
    delete_outcome: DeleteOutcome,
    drop_saved_containing: Option<&'static str>,
    /// Capabilities observed through `connect_dependency`, in call order.
    pub connected: Vec<CapabilityId>,
    /// Times the injector injected functionality into this probe.
    pub injected: u32,
    /// Settings blob the host supplied at construction, if any.
    pub persisted: Option<String>,
}

impl ProbeModule {
    fn from_builder(builder: ProbeBuilder, persisted: Option<&str>) -> Self {
        Self {
            name: builder.name,
            journal: builder.journal,
            caps: builder.caps,
            failing: builder.failing,
            provides: builder.provides,
            dependencies: builder.dependencies,
            provider: builder.provider,
            delete_outcome: builder.delete_outcome,
            drop_saved_containing: builder.drop_saved_containing,
            connected: Vec::new(),
            injected: 0,
            persisted: persisted.map(str::to_owned),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn touch(&self, hook: &'static str) -> HookResult {
        self.journal
            .borrow_mut()
            .push(format!("{}:{}", self.name, hook));
        if self.failing.contains(&hook) {
            return Err(Box::new(ProbeError {
                module: self.name,
                hook,
            }));
        }
        Ok(())
    }
}

impl EngineModule for ProbeModule {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn load(&mut self) -> HookResult {
        self.touch("load")
    }

    fn unload_hooks(&mut self) -> Option<&mut dyn UnloadHooks> {
        if self.caps.unload {
            Some(self)
        } else {
            None
        }
    }

    fn behavior_hooks(&mut self) -> Option<&mut dyn BehaviorHooks> {
        if self.caps.behavior {
            Some(self)
        } else {
            None
        }
    }

    fn scene_hooks(&mut self) -> Option<&mut dyn SceneHooks> {
        if self.caps.scene {
            Some(self)
        } else {
            None
        }
    }

    fn build_hooks(&mut self) -> Option<&mut dyn BuildHooks> {
        if self.caps.build {
            Some(self)
        } else {
            None
        }
    }

    fn asset_hooks(&mut self) -> Option<&mut dyn AssetHooks> {
        if self.caps.asset {
            Some(self)
        } else {
            None
        }
    }

    fn provides(&self) -> &[CapabilityId] {
        &self.provides
    }

    fn dependencies(&self) -> &[CapabilityId] {
        &self.dependencies
    }

    fn is_functionality_provider(&self) -> bool {
        self.provider
    }

    fn connect_dependency(
        &mut self,
        capability: CapabilityId,
        provider: &dyn EngineModule,
    ) -> HookResult {
        self.journal.borrow_mut().push(format!(
            "{}:connect:{}:{}",
            self.name,
            capability,
            module_label(provider)
        ));
        self.connected.push(capability);
        if self.failing.contains(&"connect") {
            return Err(Box::new(ProbeError {
                module: self.name,
                hook: "connect",
            }));
        }
        Ok(())
    }
}

impl UnloadHooks for ProbeModule {
    probe_touch_hooks!(unload);
}

impl BehaviorHooks for ProbeModule {
    probe_touch_hooks!(awake, enable, start, update, disable, destroy);
}

impl SceneHooks for ProbeModule {
    fn scene_opening(&mut self, _path: &str, _mode: SceneOpenMode) -> HookResult {
        self.touch("scene_opening")
    }

    fn scene_opened(&mut self, _scene: &SceneRef, _mode: SceneOpenMode) -> HookResult {
        self.touch("scene_opened")
    }

    fn scene_loaded(&mut self, _scene: &SceneRef) -> HookResult {
        self.touch("scene_loaded")
    }

    fn scene_unloaded(&mut self, _scene: &SceneRef) -> HookResult {
        self.touch("scene_unloaded")
    }

    fn active_scene_changed(&mut self, _previous: &SceneRef, _current: &SceneRef) -> HookResult {
        self.touch("active_scene_changed")
    }

    fn new_scene_created(&mut self, _scene: &SceneRef, _mode: SceneOpenMode) -> HookResult {
        self.touch("new_scene_created")
    }
}

impl BuildHooks for ProbeModule {
    fn pre_process(&mut self, _build: &BuildInfo) -> HookResult {
        self.touch("pre_process")
    }

    fn process_scene(&mut self, _scene: &SceneRef, _build: &BuildInfo) -> HookResult {
        self.touch("process_scene")
    }

    fn post_process(&mut self, _build: &BuildInfo) -> HookResult {
        self.touch("post_process")
    }
}

impl AssetHooks for ProbeModule {
    fn will_create(&mut self, _path: &str) -> HookResult {
        self.touch("will_create")
    }

    fn will_save(&mut self, paths: Vec<String>) -> HookResult<Vec<String>> {
        self.touch("will_save")?;
        Ok(match self.drop_saved_containing {
            Some(fragment) => paths.into_iter().filter(|p| !p.contains(fragment)).collect(),
            None => paths,
        })
    }

    fn will_delete(&mut self, _path: &str, _options: DeleteOptions) -> HookResult<DeleteOutcome> {
        self.touch("will_delete")?;
        Ok(self.delete_outcome)
    }
}

/// Probe name of a module, for journal labels.
fn module_label(module: &dyn EngineModule) -> &'static str {
    module
        .as_any()
        .downcast_ref::<ProbeModule>()
        .map(|p| p.name)
        .unwrap_or("<module>")
}

// =============================================================================
// PROBE INJECTOR
// =============================================================================

/// A recording functionality-injection module. Registration and injection
/// only journal what the host asked for; injections into probe targets also
/// bump the target's `injected` counter so tests can assert idempotence.
pub struct ProbeInjector {
    name: &'static str,
    journal: ProbeJournal,
    islands: Vec<IslandId>,
    active: IslandId,
}

impl ProbeInjector {
    pub fn descriptor(
        name: &'static str,
        journal: &ProbeJournal,
        islands: Vec<IslandId>,
        active: IslandId,
    ) -> ModuleDescriptor {
        let journal = journal.clone();
        ModuleDescriptor::new(name, move |_| {
            journal
                .borrow_mut()
                .push(format!("{}:construct", name));
            Some(Box::new(ProbeInjector {
                name,
                journal: journal.clone(),
                islands: islands.clone(),
                active,
            }))
        })
    }
}

impl EngineModule for ProbeInjector {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn injector(&mut self) -> Option<&mut dyn FunctionalityInjector> {
        Some(self)
    }
}

impl FunctionalityInjector for ProbeInjector {
    fn prepare_load(&mut self) -> HookResult {
        self.journal
            .borrow_mut()
            .push(format!("{}:prepare_load", self.name));
        Ok(())
    }

    fn islands(&self) -> Vec<IslandId> {
        self.islands.clone()
    }

    fn active_island(&self) -> IslandId {
        self.active
    }

    fn register_provider(&mut self, island: IslandId, provider: &dyn EngineModule) -> HookResult {
        self.journal.borrow_mut().push(format!(
            "{}:register:{}:{}",
            self.name,
            island,
            module_label(provider)
        ));
        Ok(())
    }

    fn inject(&mut self, island: IslandId, target: &mut dyn EngineModule) -> HookResult {
        let label = module_label(target);
        self.journal
            .borrow_mut()
            .push(format!("{}:inject:{}:{}", self.name, island, label));
        if let Some(probe) = target.as_any_mut().downcast_mut::<ProbeModule>() {
            probe.injected += 1;
        }
        Ok(())
    }
}

// =============================================================================
// RECORDING ENGINE COLLABORATORS
// =============================================================================

/// Scene graph that journals every node operation with a `scene:` prefix,
/// interleaved with the probes' own entries.
pub struct RecordingSceneGraph {
    next: u64,
    journal: ProbeJournal,
}

impl RecordingSceneGraph {
    pub fn new(journal: &ProbeJournal) -> Self {
        Self {
            next: 1,
            journal: journal.clone(),
        }
    }
}

impl SceneGraph for RecordingSceneGraph {
    fn create_node(&mut self, name: &str, parent: Option<NodeId>, active: bool) -> Option<NodeId> {
        let id = NodeId(self.next);
        self.next += 1;
        let parent = parent
            .map(|p| p.to_string())
            .unwrap_or_else(|| "none".to_string());
        self.journal.borrow_mut().push(format!(
            "scene:create:{}:{}:{}:{}",
            id,
            name,
            parent,
            if active { "active" } else { "inactive" }
        ));
        Some(id)
    }

    fn set_node_active(&mut self, node: NodeId, active: bool) {
        self.journal.borrow_mut().push(format!(
            "scene:{}:{}",
            if active { "activate" } else { "deactivate" },
            node
        ));
    }

    fn destroy_node(&mut self, node: NodeId) {
        self.journal
            .borrow_mut()
            .push(format!("scene:destroy:{}", node));
    }
}

/// In-memory settings source keyed by fully-qualified type name.
#[derive(Default)]
pub struct MemorySettings {
    entries: HashMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, type_name: impl Into<String>, blob: impl Into<String>) -> Self {
        self.entries.insert(type_name.into(), blob.into());
        self
    }
}

impl SettingsSource for MemorySettings {
    fn load(&self, type_name: &str) -> Option<String> {
        self.entries.get(type_name).cloned()
    }
}
