//! Scene elements
//!
//! Every node of a scene graph is a [`SceneElement`] stored in the graph's
//! arena and addressed by a [`NodeId`]. The element carries the structural
//! bookkeeping shared by all nodes:
//! - a non-owning parent handle
//! - the ordered list of owned children
//! - the lifecycle state
//! - weakly held observers
//!
//! What the node *is* lives in its [`NodeKind`].

use std::sync::{Arc, Weak};

use super::appearance::Appearance;
use super::environment::Environment;
use super::geometry::Geometry;
use super::interpolator::Interpolator;
use super::label::Label;
use super::layer::Layer;
use super::selector::Selector;
use super::switch::Switch;
use super::transform_group::{AttributeGroup, TransformGroup};

slotmap::new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`](super::SceneGraph)
    pub struct NodeId;
}

/// Lifecycle state of a scene element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementState {
    /// Live and traversed
    #[default]
    Default,
    /// Marked for removal; skipped by traversal until collected
    Destroyed,
}

/// Listener notified when a node is collected or finishes animating
///
/// Observers are held weakly; dropping the last `Arc` silently unregisters
/// them.
pub trait SceneObserver: Send + Sync {
    /// Called synchronously with the node that triggered the notification
    fn update(&self, node: NodeId);
}

/// The kind-specific payload of a scene node
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain grouping node
    Group,
    /// Light sources for the subtree
    Environment(Environment),
    /// Named display-list layer and its render flags
    Layer(Layer),
    /// Ordered transforms applied to the subtree
    TransformGroup(TransformGroup),
    /// Vertices and faces
    Geometry(Geometry),
    /// Colors for subsequent geometry
    Appearance(Appearance),
    /// Pick selector stamped on everything below
    Name(Selector),
    /// Text anchored in 3D
    Label(Label),
    /// Keyframe animation of a parent attribute
    Interpolator(Interpolator),
    /// Exposes at most one child to traversal
    Switch(Switch),
}

impl NodeKind {
    /// Human readable kind name used in error messages
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Environment(_) => "environment",
            Self::Layer(_) => "layer",
            Self::TransformGroup(_) => "transform group",
            Self::Geometry(_) => "geometry",
            Self::Appearance(_) => "appearance",
            Self::Name(_) => "name",
            Self::Label(_) => "label",
            Self::Interpolator(_) => "interpolator",
            Self::Switch(_) => "switch",
        }
    }

    /// Attribute-group view of this node, if it has one
    pub fn as_attribute_group(&self) -> Option<&dyn AttributeGroup> {
        match self {
            Self::TransformGroup(group) => Some(group),
            _ => None,
        }
    }

    /// Mutable attribute-group view of this node, if it has one
    pub fn as_attribute_group_mut(&mut self) -> Option<&mut dyn AttributeGroup> {
        match self {
            Self::TransformGroup(group) => Some(group),
            _ => None,
        }
    }
}

impl From<Environment> for NodeKind {
    fn from(value: Environment) -> Self {
        Self::Environment(value)
    }
}

impl From<Layer> for NodeKind {
    fn from(value: Layer) -> Self {
        Self::Layer(value)
    }
}

impl From<TransformGroup> for NodeKind {
    fn from(value: TransformGroup) -> Self {
        Self::TransformGroup(value)
    }
}

impl From<Geometry> for NodeKind {
    fn from(value: Geometry) -> Self {
        Self::Geometry(value)
    }
}

impl From<Appearance> for NodeKind {
    fn from(value: Appearance) -> Self {
        Self::Appearance(value)
    }
}

impl From<Selector> for NodeKind {
    fn from(value: Selector) -> Self {
        Self::Name(value)
    }
}

impl From<Label> for NodeKind {
    fn from(value: Label) -> Self {
        Self::Label(value)
    }
}

impl From<Interpolator> for NodeKind {
    fn from(value: Interpolator) -> Self {
        Self::Interpolator(value)
    }
}

impl From<Switch> for NodeKind {
    fn from(value: Switch) -> Self {
        Self::Switch(value)
    }
}

/// A node in the scene graph arena
pub struct SceneElement {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) state: ElementState,
    pub(crate) observers: Vec<Weak<dyn SceneObserver>>,
    pub(crate) observers_notified: bool,
    /// Kind-specific data
    pub kind: NodeKind,
}

impl SceneElement {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            state: ElementState::Default,
            observers: Vec::new(),
            observers_notified: false,
            kind,
        }
    }

    /// Parent handle, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Owned children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Lifecycle state
    pub fn state(&self) -> ElementState {
        self.state
    }

    /// Whether the element has been destroyed
    pub fn is_destroyed(&self) -> bool {
        self.state == ElementState::Destroyed
    }

    /// Live observers in attachment order
    pub(crate) fn live_observers(&self) -> Vec<Arc<dyn SceneObserver>> {
        self.observers.iter().filter_map(Weak::upgrade).collect()
    }
}

impl std::fmt::Debug for SceneElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneElement")
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .field("kind", &self.kind)
            .finish()
    }
}
