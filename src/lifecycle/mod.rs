//! # Module Host
//!
//! The main runtime orchestrator for the engine's module set.
//!
//! `ModuleHost` is responsible for:
//! - **Lifecycle Management**: instantiating every registered, non-excluded
//!   module type and tearing the whole set down deterministically
//! - **Ordering**: computing the six independent sort orders (load, unload,
//!   behavior, scene, build, asset) on every load
//! - **Dependency Wiring**: resolving declared capability dependencies into
//!   concrete edges and invoking the connection callbacks
//! - **Functionality Injection**: sequencing the external provider/island
//!   graph relative to the load pipeline
//! - **Event Fan-out**: forwarding engine lifecycle events to the modules
//!   subscribed to each category (see [`dispatch`] for the entry points)
//!
//! # State Machine
//!
//! ```text
//! Unloaded -> Loading -> Loaded -> Unloading -> Unloaded
//! ```
//!
//! `reload_modules` is unload followed by load with no externally observable
//! intermediate `Loaded` state. Load requests are dropped (never queued)
//! while a build is in progress or while the set is already loaded.
//!
//! # Re-entrancy
//!
//! Module hooks receive no handle to the host, and every host entry point
//! takes `&mut self`, so re-entrant `load_modules`/`unload_modules` calls
//! from inside a lifecycle hook are rejected at compile time. The
//! scene-triggered reload is performed by the dispatcher itself, after the
//! dispatch pass completes.
//!
//! # Concurrency Model
//!
//! Single-threaded, cooperative: all orchestration runs on the engine's main
//! update thread, every call is synchronous fan-out, and the module set is
//! mutated only by the host. No locks, no atomics.

pub mod dispatch;
pub mod settings;
pub mod tracing;

use ::tracing::{debug, error, info, warn};

use crate::engine::{DetachedSceneGraph, NodeId, NullSettings, SceneGraph, SettingsSource};
use crate::framework::descriptor::{HostingKind, ModuleDescriptor, ModuleRegistry};
use crate::framework::error::ModuleError;
use crate::framework::module::{Capabilities, EngineModule};
use crate::framework::ordering::{compare_keys, ModuleOrders, OrderSpace};

use self::settings::{ModuleConfig, Platform, RuntimeMode};

/// Name of the hidden scene node that parents every scene-backed module.
const MODULE_ROOT_NAME: &str = "__engine_modules";

/// Phase of the load/unload state machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Unloading,
}

/// One loaded module plus everything the host caches about it.
pub(crate) struct LoadedModule {
    pub(crate) name: &'static str,
    pub(crate) hosting: HostingKind,
    pub(crate) orders: ModuleOrders,
    pub(crate) caps: Capabilities,
    pub(crate) node: Option<NodeId>,
    pub(crate) module: Box<dyn EngineModule>,
}

/// The module-lifecycle orchestrator. See the module docs for the contract.
pub struct ModuleHost {
    registry: ModuleRegistry,
    config: ModuleConfig,
    platform: Platform,
    mode: RuntimeMode,
    scene: Box<dyn SceneGraph>,
    settings: Box<dyn SettingsSource>,

    state: LoadState,
    pub(crate) building: bool,
    pub(crate) scene_callbacks_blocked: bool,
    pub(crate) awake_injection_done: bool,
    module_root: Option<NodeId>,

    pub(crate) modules: Vec<LoadedModule>,
    pub(crate) unload_list: Vec<usize>,
    pub(crate) behavior_list: Vec<usize>,
    pub(crate) scene_list: Vec<usize>,
    pub(crate) build_list: Vec<usize>,
    pub(crate) asset_list: Vec<usize>,
}

impl ModuleHost {
    /// Creates a host with detached engine collaborators. Scene-node-backed
    /// modules will fail construction (logged, skipped) and settings-backed
    /// modules construct from defaults.
    pub fn new(
        registry: ModuleRegistry,
        config: ModuleConfig,
        platform: Platform,
        mode: RuntimeMode,
    ) -> Self {
        Self::with_collaborators(
            registry,
            config,
            platform,
            mode,
            Box::new(DetachedSceneGraph),
            Box::new(NullSettings),
        )
    }

    /// Creates a host wired to the engine's scene graph and settings layer.
    pub fn with_collaborators(
        registry: ModuleRegistry,
        config: ModuleConfig,
        platform: Platform,
        mode: RuntimeMode,
        scene: Box<dyn SceneGraph>,
        settings: Box<dyn SettingsSource>,
    ) -> Self {
        Self {
            registry,
            config,
            platform,
            mode,
            scene,
            settings,
            state: LoadState::Unloaded,
            building: false,
            scene_callbacks_blocked: false,
            awake_injection_done: false,
            module_root: None,
            modules: Vec::new(),
            unload_list: Vec::new(),
            behavior_list: Vec::new(),
            scene_list: Vec::new(),
            build_list: Vec::new(),
            asset_list: Vec::new(),
        }
    }

    // =====================================================================
    // Load
    // =====================================================================

    /// Loads the module set: resolve exclusions, instantiate, sort all six
    /// order spaces, wire dependencies, inject functionality, fire `load`
    /// hooks, then activate deferred scene nodes.
    ///
    /// Dropped with a debug log while a build is in progress or while the
    /// set is not in the `Unloaded` state.
    pub fn load_modules(&mut self) {
        if self.building {
            debug!("Load request dropped: build in progress");
            return;
        }
        if self.state != LoadState::Unloaded {
            debug!(state = ?self.state, "Load request dropped: modules not unloaded");
            return;
        }
        self.state = LoadState::Loading;
        self.awake_injection_done = false;

        let exclusions = self
            .config
            .resolve_exclusions(self.platform, self.mode)
            .to_vec();
        info!(
            candidates = self.registry.len(),
            excluded = exclusions.len(),
            platform = ?self.platform,
            mode = ?self.mode,
            "Loading modules"
        );

        // 1. Instantiate one module per non-excluded descriptor. The
        // registry is taken out for the duration so construction can borrow
        // the engine collaborators mutably.
        let registry = std::mem::take(&mut self.registry);
        for descriptor in registry.descriptors() {
            if exclusions.iter().any(|e| e == descriptor.type_name) {
                debug!(module = descriptor.type_name, "Excluded by configuration");
                continue;
            }
            match self.instantiate(descriptor) {
                Ok(entry) => {
                    debug!(module = entry.name, hosting = ?entry.hosting, "Module instantiated");
                    self.modules.push(entry);
                }
                Err(e) => error!(module = descriptor.type_name, error = %e, "Module construction failed"),
            }
        }
        self.registry = registry;

        // 2. Orders are re-read on every load, never cached across loads.
        self.modules.sort_by(|a, b| {
            compare_keys(
                (a.orders.get(OrderSpace::Load), a.name),
                (b.orders.get(OrderSpace::Load), b.name),
            )
        });
        self.rebuild_views();

        // 3-4. Wiring, then injection, strictly before any load hook.
        self.wire_dependencies();
        self.inject_functionality(true);

        // 5. Load hooks, in load order, failure isolated per module.
        for i in 0..self.modules.len() {
            let entry = &mut self.modules[i];
            if let Err(e) = entry.module.load() {
                error!(module = entry.name, error = %e, "Load hook failed");
            }
        }

        // 6. Scene-backed modules were created inactive; only now, with the
        // whole pipeline done, may engine callbacks reach them.
        for i in 0..self.modules.len() {
            if let Some(node) = self.modules[i].node {
                self.scene.set_node_active(node, true);
            }
        }

        self.state = LoadState::Loaded;
        info!(count = self.modules.len(), "Modules loaded");
    }

    /// Applies the per-type construction strategy and probes capabilities.
    fn instantiate(&mut self, descriptor: &ModuleDescriptor) -> Result<LoadedModule, ModuleError> {
        let mut node = None;
        let mut persisted = None;
        match descriptor.hosting {
            HostingKind::Plain => {}
            HostingKind::Settings => {
                persisted = self.settings.load(descriptor.type_name);
            }
            HostingKind::SceneObject => {
                let root = self.ensure_module_root();
                node = self
                    .scene
                    .create_node(short_name(descriptor.type_name), root, false);
                if node.is_none() {
                    return Err(ModuleError::Construction(descriptor.type_name));
                }
            }
        }

        match (descriptor.construct)(persisted.as_deref()) {
            Some(mut module) => {
                let caps = Capabilities::probe(module.as_mut());
                Ok(LoadedModule {
                    name: descriptor.type_name,
                    hosting: descriptor.hosting,
                    orders: descriptor.orders,
                    caps,
                    node,
                    module,
                })
            }
            None => {
                if let Some(node) = node {
                    self.scene.destroy_node(node);
                }
                Err(ModuleError::Construction(descriptor.type_name))
            }
        }
    }

    fn ensure_module_root(&mut self) -> Option<NodeId> {
        if self.module_root.is_none() {
            self.module_root = self.scene.create_node(MODULE_ROOT_NAME, None, false);
        }
        self.module_root
    }

    /// Recomputes the five derived views over the module set, each sorted in
    /// its own order space.
    fn rebuild_views(&mut self) {
        self.unload_list = self.space_indices(OrderSpace::Unload, |c| c.unload);
        self.behavior_list = self.space_indices(OrderSpace::Behavior, |c| c.behavior);
        self.scene_list = self.space_indices(OrderSpace::Scene, |c| c.scene);
        self.build_list = self.space_indices(OrderSpace::Build, |c| c.build);
        self.asset_list = self.space_indices(OrderSpace::Asset, |c| c.asset);
    }

    fn space_indices(
        &self,
        space: OrderSpace,
        member: impl Fn(&Capabilities) -> bool,
    ) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .modules
            .iter()
            .enumerate()
            .filter(|(_, m)| member(&m.caps))
            .map(|(i, _)| i)
            .collect();
        indices.sort_by(|&a, &b| {
            compare_keys(
                (self.modules[a].orders.get(space), self.modules[a].name),
                (self.modules[b].orders.get(space), self.modules[b].name),
            )
        });
        indices
    }

    // =====================================================================
    // Dependency wiring
    // =====================================================================

    /// Resolves every declared (consumer, capability) pair against the
    /// loaded set and fires the connection callback once per matching
    /// provider. Best effort: a failing edge is logged and the pass
    /// continues with the remaining edges.
    fn wire_dependencies(&mut self) {
        for consumer in 0..self.modules.len() {
            let wanted = self.modules[consumer].module.dependencies().to_vec();
            for capability in wanted {
                for provider in 0..self.modules.len() {
                    if provider == consumer {
                        continue;
                    }
                    if !self.modules[provider]
                        .module
                        .provides()
                        .contains(&capability)
                    {
                        continue;
                    }
                    let (consumer_entry, provider_entry) =
                        pair_mut(&mut self.modules, consumer, provider);
                    debug!(
                        consumer = consumer_entry.name,
                        provider = provider_entry.name,
                        capability = %capability,
                        "Connecting dependency"
                    );
                    if let Err(cause) = consumer_entry
                        .module
                        .connect_dependency(capability, provider_entry.module.as_ref())
                    {
                        let e = ModuleError::Connection {
                            consumer: consumer_entry.name,
                            capability,
                            cause,
                        };
                        error!(error = %e, "Dependency connection failed");
                    }
                }
            }
        }
    }

    // =====================================================================
    // Functionality injection bridge
    // =====================================================================

    /// Runs the injection sequence against the injector module, if one is
    /// loaded: pre-load hook (initial pass only), provider registration into
    /// every island, then injection from the active island into every
    /// module. Absence of an injector is a normal configuration.
    pub(crate) fn inject_functionality(&mut self, initial: bool) {
        let injector = match self.modules.iter().position(|m| m.caps.injector) {
            Some(i) => i,
            None => {
                debug!("No functionality-injection module present");
                return;
            }
        };
        let extras = self.modules.iter().filter(|m| m.caps.injector).count() - 1;
        if extras > 0 {
            warn!(
                ignored = extras,
                "Multiple functionality-injection modules; using the first"
            );
        }

        let providers: Vec<usize> = self
            .modules
            .iter()
            .enumerate()
            .filter(|(_, m)| m.caps.provider)
            .map(|(i, _)| i)
            .collect();
        info!(
            injector = self.modules[injector].name,
            providers = providers.len(),
            initial,
            "Injecting functionality"
        );

        if initial {
            let entry = &mut self.modules[injector];
            let name = entry.name;
            if let Some(hook) = entry.module.injector() {
                if let Err(e) = hook.prepare_load() {
                    error!(module = name, error = %e, "Injector pre-load hook failed");
                }
            }
        }

        let Some((islands, active)) = self.modules[injector]
            .module
            .injector()
            .map(|i| (i.islands(), i.active_island()))
        else {
            return;
        };

        // Register every provider into every island the injector owns. The
        // injector registers itself internally if it is also a provider.
        for island in &islands {
            for &provider in &providers {
                if provider == injector {
                    continue;
                }
                let (injector_entry, provider_entry) =
                    pair_mut(&mut self.modules, injector, provider);
                let provider_name = provider_entry.name;
                if let Some(hook) = injector_entry.module.injector() {
                    if let Err(e) =
                        hook.register_provider(*island, provider_entry.module.as_ref())
                    {
                        error!(
                            island = %island,
                            provider = provider_name,
                            error = %e,
                            "Provider registration failed"
                        );
                    }
                }
            }
        }

        // Inject from the active island into every loaded module, providers
        // and plain consumers alike.
        for target in 0..self.modules.len() {
            if target == injector {
                continue;
            }
            let (injector_entry, target_entry) = pair_mut(&mut self.modules, injector, target);
            let target_name = target_entry.name;
            if let Some(hook) = injector_entry.module.injector() {
                if let Err(e) = hook.inject(active, target_entry.module.as_mut()) {
                    error!(
                        island = %active,
                        module = target_name,
                        error = %e,
                        "Functionality injection failed"
                    );
                }
            }
        }
    }

    // =====================================================================
    // Unload
    // =====================================================================

    /// Tears the module set down: unload hooks in unload order (failure
    /// isolated), scene-node destruction, list clearing, module-root
    /// destruction. Idempotent: a second call finds an empty set and
    /// performs no module callbacks.
    pub fn unload_modules(&mut self) {
        if self.state == LoadState::Unloaded && self.modules.is_empty() {
            debug!("Unload request ignored: nothing loaded");
            return;
        }
        self.state = LoadState::Unloading;
        info!(count = self.modules.len(), "Unloading modules");

        let unload_order = self.unload_list.clone();
        for i in unload_order {
            let entry = &mut self.modules[i];
            let name = entry.name;
            if let Some(hook) = entry.module.unload_hooks() {
                debug!(module = name, "Unload hook");
                if let Err(e) = hook.unload() {
                    error!(module = name, error = %e, "Unload hook failed");
                }
            }
        }

        for i in 0..self.modules.len() {
            if let Some(node) = self.modules[i].node.take() {
                self.scene.destroy_node(node);
            }
        }

        self.modules.clear();
        self.unload_list.clear();
        self.behavior_list.clear();
        self.scene_list.clear();
        self.build_list.clear();
        self.asset_list.clear();
        self.state = LoadState::Unloaded;

        if let Some(root) = self.module_root.take() {
            self.scene.destroy_node(root);
        }
        info!("Modules unloaded");
    }

    /// Unload followed by load, with no externally observable intermediate
    /// `Loaded` state. Dropped entirely while a build is in progress so the
    /// set is never torn down without being rebuilt.
    pub fn reload_modules(&mut self) {
        if self.building {
            debug!("Reload request dropped: build in progress");
            return;
        }
        info!("Reloading modules");
        self.unload_modules();
        self.load_modules();
    }

    // =====================================================================
    // Query surface
    // =====================================================================

    /// First loaded module of concrete type `T`, or none.
    pub fn get_module<T: EngineModule>(&self) -> Option<&T> {
        self.modules
            .iter()
            .find_map(|m| m.module.as_any().downcast_ref::<T>())
    }

    pub fn get_module_mut<T: EngineModule>(&mut self) -> Option<&mut T> {
        self.modules
            .iter_mut()
            .find_map(|m| m.module.as_any_mut().downcast_mut::<T>())
    }

    /// Type names of the current module set, in load order.
    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name).collect()
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    pub fn is_unloading(&self) -> bool {
        self.state == LoadState::Unloading
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_building(&self) -> bool {
        self.building
    }

    /// Globally blocks or unblocks scene callbacks (dispatch and the
    /// scene-triggered reload alike).
    pub fn set_scene_callbacks_blocked(&mut self, blocked: bool) {
        self.scene_callbacks_blocked = blocked;
    }
}

/// Last path segment of a fully-qualified type name, used to label scene
/// nodes.
fn short_name(type_name: &'static str) -> &'static str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

/// Mutable access to two distinct entries of one slice.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (head, tail) = items.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}
