//! Scene graph arena
//!
//! [`SceneGraph`] owns every node of one or more scene trees. Nodes refer to
//! each other through [`NodeId`] handles: a parent owns the ordered list of
//! its children, a child keeps a plain back-reference to its parent.
//!
//! Removal is two-phase. [`SceneGraph::destroy`] only marks a node and queues
//! it, so a traversal that is walking the child lists is never invalidated.
//! [`SceneGraph::collect_garbage`] later detaches every queued node, notifies
//! its observers and frees it together with its subtree.

use std::sync::{Arc, Weak};

use log::debug;
use slotmap::SlotMap;

use super::element::{ElementState, NodeId, NodeKind, SceneElement, SceneObserver};
use super::error::SceneError;
use super::interpolator::{Interpolator, InterpolatorState, InterpolatorStep};
use super::mutex::SceneMutex;
use super::switch::Switch;
use super::transform_group::{Attribute, TransformGroup};
use super::visitor::{self, SceneVisitor};

/// Arena of scene nodes plus the pending-destruction queue
#[derive(Debug, Default)]
pub struct SceneGraph {
    elements: SlotMap<NodeId, SceneElement>,
    pending: Vec<NodeId>,
    mutex: Arc<SceneMutex>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ---- structure ----

    /// Add a detached node
    pub fn insert(&mut self, kind: impl Into<NodeKind>) -> NodeId {
        self.elements.insert(SceneElement::new(kind.into()))
    }

    /// Add a node as the last child of `parent`
    pub fn insert_child(&mut self, parent: NodeId, kind: impl Into<NodeKind>) -> Result<NodeId, SceneError> {
        self.element(parent)?;
        let child = self.insert(kind);
        self.add_child(parent, child)?;
        Ok(child)
    }

    /// Append `child` to `parent`, detaching it from any previous parent first
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.element(parent)?;
        self.element(child)?;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        self.detach(child);
        self.elements[parent].children.push(child);
        self.elements[child].parent = Some(parent);
        Ok(())
    }

    /// Make `parent` the parent of `child`
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), SceneError> {
        self.add_child(parent, child)
    }

    /// Detach `child` from `parent`; does nothing if it is not a child
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.element(parent)?;
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
        Ok(())
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.elements.get(id).and_then(|element| element.parent)
    }

    /// Children of a node in insertion order; empty for unknown handles
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.elements
            .get(id)
            .map(|element| element.children.as_slice())
            .unwrap_or_default()
    }

    /// Child at `index`
    pub fn child(&self, id: NodeId, index: usize) -> Result<NodeId, SceneError> {
        let children = &self.element(id)?.children;
        children
            .get(index)
            .copied()
            .ok_or(SceneError::ChildIndexOutOfRange { index, len: children.len() })
    }

    /// Children a traversal descends into
    ///
    /// A switch exposes only its selected child.
    pub fn traversal_children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(element) = self.elements.get(id) else {
            return Vec::new();
        };
        match &element.kind {
            NodeKind::Switch(switch) => switch.selected.into_iter().collect(),
            _ => element.children.clone(),
        }
    }

    /// Select the switch child at `index`, or clear the selection with `None`
    pub fn set_switch(&mut self, id: NodeId, index: Option<usize>) -> Result<(), SceneError> {
        let selected = index.map(|index| self.child(id, index)).transpose()?;
        match &mut self.element_mut(id)?.kind {
            NodeKind::Switch(switch) => {
                switch.selected = selected;
                Ok(())
            }
            _ => Err(SceneError::WrongKind { node: id, expected: "switch" }),
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        while let Some(parent) = self.parent(id) {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.elements.get_mut(child).and_then(|element| element.parent.take()) else {
            return;
        };
        if let Some(parent) = self.elements.get_mut(parent) {
            parent.children.retain(|&id| id != child);
            if let NodeKind::Switch(switch) = &mut parent.kind {
                if switch.selected == Some(child) {
                    switch.selected = None;
                }
            }
        }
    }

    // ---- lifecycle ----

    /// Mark a node for removal
    ///
    /// The node stays attached, but is no longer traversed, until the next
    /// [`collect_garbage`](Self::collect_garbage). Destroying twice is the
    /// same as destroying once.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), SceneError> {
        let element = self.element_mut(id)?;
        if element.state == ElementState::Destroyed {
            return Ok(());
        }
        element.state = ElementState::Destroyed;
        self.pending.push(id);
        Ok(())
    }

    /// Detach, notify and free every node destroyed since the last sweep
    ///
    /// Returns the number of nodes freed, subtrees included.
    pub fn collect_garbage(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return 0;
        }

        for &id in &pending {
            if !self.elements.contains_key(id) {
                continue;
            }
            self.detach(id);
            if !self.elements[id].observers_notified {
                self.elements[id].observers_notified = true;
                self.notify(id);
            }
        }

        let mut freed = 0;
        for id in pending {
            let mut stack = vec![id];
            while let Some(next) = stack.pop() {
                if let Some(element) = self.elements.remove(next) {
                    stack.extend(element.children);
                    freed += 1;
                }
            }
        }
        debug!("Scene garbage collection freed {freed} nodes");
        freed
    }

    /// Nodes destroyed but not yet collected, in destruction order
    pub fn pending_destruction(&self) -> &[NodeId] {
        &self.pending
    }

    /// Lifecycle state of a node; `None` once it has been collected
    pub fn state(&self, id: NodeId) -> Option<ElementState> {
        self.elements.get(id).map(|element| element.state)
    }

    /// Whether the handle refers to a node still in the arena
    pub fn contains(&self, id: NodeId) -> bool {
        self.elements.contains_key(id)
    }

    // ---- observers ----

    /// Register an observer; the graph keeps only a weak reference
    pub fn attach_observer<O: SceneObserver + 'static>(
        &mut self,
        id: NodeId,
        observer: &Arc<O>,
    ) -> Result<(), SceneError> {
        let observer: Weak<O> = Arc::downgrade(observer);
        self.element_mut(id)?.observers.push(observer as Weak<dyn SceneObserver>);
        Ok(())
    }

    /// Unregister an observer previously attached to `id`
    pub fn detach_observer<O: SceneObserver + 'static>(
        &mut self,
        id: NodeId,
        observer: &Arc<O>,
    ) -> Result<(), SceneError> {
        let target = Arc::as_ptr(observer).cast::<()>();
        self.element_mut(id)?
            .observers
            .retain(|weak| weak.as_ptr().cast::<()>() != target);
        Ok(())
    }

    /// Call every live observer of `id` in attachment order
    pub fn notify_observers(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.element(id)?;
        self.notify(id);
        Ok(())
    }

    fn notify(&mut self, id: NodeId) {
        let Some(element) = self.elements.get_mut(id) else {
            return;
        };
        element.observers.retain(|weak| weak.strong_count() > 0);
        for observer in element.live_observers() {
            observer.update(id);
        }
    }

    // ---- interpolation ----

    /// Drive an interpolator with the current scene time in milliseconds
    ///
    /// Writes the interpolated value into the parent's attribute. When the
    /// last keyframe has passed the final value is written, the interpolator
    /// destroys itself and its observers are notified once. Destroyed
    /// interpolators, and interpolators whose parent has no attributes, are
    /// left untouched.
    pub fn update_interpolator(&mut self, id: NodeId, now: u64) -> Result<InterpolatorState, SceneError> {
        let element = self.element(id)?;
        let NodeKind::Interpolator(interpolator) = &element.kind else {
            return Err(SceneError::WrongKind { node: id, expected: "interpolator" });
        };
        let state = interpolator.state();
        if element.is_destroyed() {
            return Ok(state);
        }
        let animates_parent = element
            .parent
            .and_then(|parent| self.elements.get(parent))
            .is_some_and(|parent| parent.kind.as_attribute_group().is_some());
        if !animates_parent {
            return Ok(state);
        }

        let interpolator = self.interpolator_mut(id)?;
        let attribute = interpolator.attribute();
        let step = interpolator.advance(now);
        let state = interpolator.state();

        let value = match step {
            InterpolatorStep::Idle => return Ok(state),
            InterpolatorStep::Set(value) | InterpolatorStep::Complete(value) => value,
        };
        if let Some(parent) = self.parent(id) {
            self.set_attribute(parent, attribute, value)?;
        }
        if let InterpolatorStep::Complete(_) = step {
            self.destroy(id)?;
            self.elements[id].observers_notified = true;
            self.notify(id);
        }
        Ok(state)
    }

    // ---- access ----

    /// Element behind a handle
    pub fn get(&self, id: NodeId) -> Option<&SceneElement> {
        self.elements.get(id)
    }

    /// Kind data behind a handle
    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, SceneError> {
        Ok(&self.element(id)?.kind)
    }

    /// Mutable kind data behind a handle
    pub fn kind_mut(&mut self, id: NodeId) -> Result<&mut NodeKind, SceneError> {
        Ok(&mut self.element_mut(id)?.kind)
    }

    /// Transform group behind a handle
    pub fn transform_group(&self, id: NodeId) -> Result<&TransformGroup, SceneError> {
        match self.kind(id)? {
            NodeKind::TransformGroup(group) => Ok(group),
            _ => Err(SceneError::WrongKind { node: id, expected: "transform group" }),
        }
    }

    /// Mutable transform group behind a handle
    pub fn transform_group_mut(&mut self, id: NodeId) -> Result<&mut TransformGroup, SceneError> {
        match self.kind_mut(id)? {
            NodeKind::TransformGroup(group) => Ok(group),
            _ => Err(SceneError::WrongKind { node: id, expected: "transform group" }),
        }
    }

    /// Interpolator behind a handle
    pub fn interpolator(&self, id: NodeId) -> Result<&Interpolator, SceneError> {
        match self.kind(id)? {
            NodeKind::Interpolator(interpolator) => Ok(interpolator),
            _ => Err(SceneError::WrongKind { node: id, expected: "interpolator" }),
        }
    }

    fn interpolator_mut(&mut self, id: NodeId) -> Result<&mut Interpolator, SceneError> {
        match self.kind_mut(id)? {
            NodeKind::Interpolator(interpolator) => Ok(interpolator),
            _ => Err(SceneError::WrongKind { node: id, expected: "interpolator" }),
        }
    }

    /// Switch behind a handle
    pub fn switch(&self, id: NodeId) -> Result<&Switch, SceneError> {
        match self.kind(id)? {
            NodeKind::Switch(switch) => Ok(switch),
            _ => Err(SceneError::WrongKind { node: id, expected: "switch" }),
        }
    }

    /// Read an attribute of an attribute-group node
    pub fn attribute(&self, id: NodeId, attribute: Attribute) -> Result<f64, SceneError> {
        self.kind(id)?
            .as_attribute_group()
            .map(|group| group.attribute(attribute))
            .ok_or(SceneError::WrongKind { node: id, expected: "attribute group" })
    }

    /// Write an attribute of an attribute-group node
    pub fn set_attribute(&mut self, id: NodeId, attribute: Attribute, value: f64) -> Result<(), SceneError> {
        let group = self
            .kind_mut(id)?
            .as_attribute_group_mut()
            .ok_or(SceneError::WrongKind { node: id, expected: "attribute group" })?;
        group.set_attribute(attribute, value);
        Ok(())
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the arena is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Lock serializing structural changes against rendering
    pub fn mutex(&self) -> Arc<SceneMutex> {
        Arc::clone(&self.mutex)
    }

    /// Depth-first traversal from `root`, skipping destroyed subtrees
    pub fn traverse<V: SceneVisitor + ?Sized>(&mut self, root: NodeId, visitor: &mut V) {
        visitor::traverse(self, root, visitor);
    }

    fn element(&self, id: NodeId) -> Result<&SceneElement, SceneError> {
        self.elements.get(id).ok_or(SceneError::UnknownNode(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut SceneElement, SceneError> {
        self.elements.get_mut(id).ok_or(SceneError::UnknownNode(id))
    }
}
