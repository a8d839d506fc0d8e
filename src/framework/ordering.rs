//! # Order Spaces
//!
//! Modules are sorted in six independent contexts: the load order of the
//! whole set, the unload order of the teardown pass, and one dispatch order
//! per callback category. Every module defaults to order `0` in every space;
//! a descriptor may override individual spaces through [`ModuleOrders`].
//!
//! Sorting is total and deterministic: the primary key is the order value
//! ascending, and ties are always broken by the fully-qualified type name,
//! lexicographic ascending. Registration order never leaks into the result,
//! so repeated loads of the same set produce identical sequences.

use std::cmp::Ordering;

/// One of the six independent sort contexts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OrderSpace {
    Load,
    Unload,
    Behavior,
    Scene,
    Build,
    Asset,
}

/// Per-space order overrides attached to a module descriptor.
///
/// The `with_*` builders mirror the attribute-per-category annotations a
/// module author would otherwise sprinkle over the type: only the spaces a
/// module cares about are overridden, everything else stays at the default.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct ModuleOrders {
    pub load: i32,
    pub unload: i32,
    pub behavior: i32,
    pub scene: i32,
    pub build: i32,
    pub asset: i32,
}

impl ModuleOrders {
    /// Sets the same order value in every space.
    pub fn uniform(order: i32) -> Self {
        Self {
            load: order,
            unload: order,
            behavior: order,
            scene: order,
            build: order,
            asset: order,
        }
    }

    pub fn with_load(mut self, order: i32) -> Self {
        self.load = order;
        self
    }

    pub fn with_unload(mut self, order: i32) -> Self {
        self.unload = order;
        self
    }

    pub fn with_behavior(mut self, order: i32) -> Self {
        self.behavior = order;
        self
    }

    pub fn with_scene(mut self, order: i32) -> Self {
        self.scene = order;
        self
    }

    pub fn with_build(mut self, order: i32) -> Self {
        self.build = order;
        self
    }

    pub fn with_asset(mut self, order: i32) -> Self {
        self.asset = order;
        self
    }

    /// The order value for one space.
    pub fn get(&self, space: OrderSpace) -> i32 {
        match space {
            OrderSpace::Load => self.load,
            OrderSpace::Unload => self.unload,
            OrderSpace::Behavior => self.behavior,
            OrderSpace::Scene => self.scene,
            OrderSpace::Build => self.build,
            OrderSpace::Asset => self.asset,
        }
    }
}

/// Deterministic comparison of two (order, type name) keys.
pub(crate) fn compare_keys(a: (i32, &str), b: (i32, &str)) -> Ordering {
    a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1))
}
