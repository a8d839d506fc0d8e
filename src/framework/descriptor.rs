//! # Module Descriptors & Registry
//!
//! Module types are not discovered by reflection. The host consumes an
//! explicit descriptor table: one [`ModuleDescriptor`] per module type,
//! carrying the fully-qualified type name (the module's identity), the
//! hosting kind that selects the construction strategy, the per-space order
//! overrides, and a constructor thunk. The application assembles a
//! [`ModuleRegistry`] from these at startup and hands it to the host.

use tracing::debug;

use crate::framework::error::ModuleError;
use crate::framework::module::EngineModule;
use crate::framework::ordering::ModuleOrders;

/// How the host constructs and hosts a module of this type.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HostingKind {
    /// Default-constructed, fully owned by the host.
    Plain,
    /// Settings-backed: the host fetches the persisted blob from the
    /// [`SettingsSource`](crate::engine::SettingsSource) keyed by type name
    /// and passes it to the constructor.
    Settings,
    /// Backed by a scene node: the host creates a new *inactive* node under
    /// the hidden module-root node, constructs the module, and activates the
    /// node only once the whole load pipeline has completed.
    SceneObject,
}

/// Constructor thunk. `persisted` carries the settings blob for
/// [`HostingKind::Settings`] modules and is `None` otherwise. Returning
/// `None` is a construction failure: the type is skipped and the load
/// continues.
pub type ModuleConstructor = dyn Fn(Option<&str>) -> Option<Box<dyn EngineModule>>;

/// Static description of one module type.
pub struct ModuleDescriptor {
    /// Fully-qualified type name; the module's identity and the sort
    /// tie-break key in every order space.
    pub type_name: &'static str,
    pub hosting: HostingKind,
    pub orders: ModuleOrders,
    pub(crate) construct: Box<ModuleConstructor>,
}

impl ModuleDescriptor {
    pub fn new(
        type_name: &'static str,
        construct: impl Fn(Option<&str>) -> Option<Box<dyn EngineModule>> + 'static,
    ) -> Self {
        Self {
            type_name,
            hosting: HostingKind::Plain,
            orders: ModuleOrders::default(),
            construct: Box::new(construct),
        }
    }

    pub fn hosted(mut self, hosting: HostingKind) -> Self {
        self.hosting = hosting;
        self
    }

    pub fn orders(mut self, orders: ModuleOrders) -> Self {
        self.orders = orders;
        self
    }
}

/// The set of known module types for one host.
///
/// Registration is explicit and happens before the first load. Duplicate
/// type names are rejected so the "one instance per type" invariant holds by
/// construction.
#[derive(Default)]
pub struct ModuleRegistry {
    descriptors: Vec<ModuleDescriptor>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: ModuleDescriptor) -> Result<(), ModuleError> {
        if self
            .descriptors
            .iter()
            .any(|d| d.type_name == descriptor.type_name)
        {
            return Err(ModuleError::DuplicateModule(descriptor.type_name));
        }
        debug!(module = descriptor.type_name, "Module type registered");
        self.descriptors.push(descriptor);
        Ok(())
    }

    pub fn descriptors(&self) -> &[ModuleDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
