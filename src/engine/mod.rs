//! # Engine Collaborator Interfaces
//!
//! The host talks to the rest of the engine exclusively through the thin
//! trait seams in this module: the scene graph (for scene-node-backed
//! modules), the settings persistence layer (for settings-backed modules),
//! and the payload types carried by scene, build, and asset events. Nothing
//! here owns behavior; concrete implementations live in the host
//! application, and the [`framework::mock`](crate::framework::mock) module
//! provides recording fakes for tests.

use std::fmt;

/// Handle to a node in the engine's scene graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Minimal scene-graph surface the host needs for scene-node-backed modules.
pub trait SceneGraph {
    /// Creates a node, optionally parented, in the given activation state.
    /// Returns `None` when the engine cannot create nodes right now; the
    /// host treats that as a construction failure for the affected module.
    fn create_node(&mut self, name: &str, parent: Option<NodeId>, active: bool) -> Option<NodeId>;

    fn set_node_active(&mut self, node: NodeId, active: bool);

    fn destroy_node(&mut self, node: NodeId);
}

/// A scene graph for hosts that run without one. Every creation fails, so
/// scene-node-backed modules are skipped with a logged construction error.
pub struct DetachedSceneGraph;

impl SceneGraph for DetachedSceneGraph {
    fn create_node(&mut self, _name: &str, _parent: Option<NodeId>, _active: bool) -> Option<NodeId> {
        None
    }

    fn set_node_active(&mut self, _node: NodeId, _active: bool) {}

    fn destroy_node(&mut self, _node: NodeId) {}
}

/// Persistence layer for settings-backed modules. The host fetches the blob
/// keyed by the module's fully-qualified type name and hands it to the
/// constructor; deserialization is the module's business.
pub trait SettingsSource {
    fn load(&self, type_name: &str) -> Option<String>;
}

/// A settings source with nothing persisted.
pub struct NullSettings;

impl SettingsSource for NullSettings {
    fn load(&self, _type_name: &str) -> Option<String> {
        None
    }
}

/// Reference to a scene involved in a transition event.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SceneRef {
    pub name: String,
}

impl SceneRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// How a scene enters the engine. A `Single` transition replaces the whole
/// scene setup and triggers a full module reload; `Additive` leaves the
/// loaded set alone.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SceneOpenMode {
    Single,
    Additive,
}

/// Summary of an in-progress player build, passed to build hooks.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub target: String,
    pub output_path: String,
}

/// Host intent carried by an asset-delete interception.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeleteOptions {
    MoveToTrash,
    DeleteOutright,
}

/// Aggregate answer of an asset-delete interception pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeleteOutcome {
    /// No subscriber handled the deletion; the engine proceeds itself.
    DidNotDelete,
    /// At least one subscriber handled the deletion.
    DidDelete,
}
