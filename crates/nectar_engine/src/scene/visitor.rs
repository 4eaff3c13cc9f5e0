//! Scene traversal
//!
//! [`traverse`] walks a tree depth first. For every live node it calls the
//! visitor's `pre_order_*` handler for the node's kind, descends into the
//! node's traversal children, then calls the matching `post_order_*`
//! handler. Destroyed nodes are skipped together with their subtrees.
//!
//! Every handler has an empty default so a visitor only implements what it
//! needs. Interpolators get mutable access to the graph in their pre-order
//! handler so the visitor can drive them.

use log::trace;

use super::appearance::Appearance;
use super::element::{NodeId, NodeKind};
use super::environment::Environment;
use super::geometry::Geometry;
use super::graph::SceneGraph;
use super::interpolator::Interpolator;
use super::label::Label;
use super::layer::Layer;
use super::selector::Selector;
use super::switch::Switch;
use super::transform_group::TransformGroup;

/// Per-kind callbacks invoked by [`traverse`]
#[allow(unused_variables)]
pub trait SceneVisitor {
    /// Entering a plain group
    fn pre_order_group(&mut self, id: NodeId) {}
    /// Leaving a plain group
    fn post_order_group(&mut self, id: NodeId) {}

    /// Entering an environment
    fn pre_order_environment(&mut self, id: NodeId, environment: &Environment) {}
    /// Leaving an environment
    fn post_order_environment(&mut self, id: NodeId, environment: &Environment) {}

    /// Entering a layer
    fn pre_order_layer(&mut self, id: NodeId, layer: &Layer) {}
    /// Leaving a layer
    fn post_order_layer(&mut self, id: NodeId, layer: &Layer) {}

    /// Entering a transform group
    fn pre_order_transform_group(&mut self, id: NodeId, group: &TransformGroup) {}
    /// Leaving a transform group
    fn post_order_transform_group(&mut self, id: NodeId, group: &TransformGroup) {}

    /// Entering geometry
    fn pre_order_geometry(&mut self, id: NodeId, geometry: &Geometry) {}
    /// Leaving geometry
    fn post_order_geometry(&mut self, id: NodeId, geometry: &Geometry) {}

    /// Entering an appearance
    fn pre_order_appearance(&mut self, id: NodeId, appearance: &Appearance) {}
    /// Leaving an appearance
    fn post_order_appearance(&mut self, id: NodeId, appearance: &Appearance) {}

    /// Entering a name
    fn pre_order_name(&mut self, id: NodeId, selector: &Selector) {}
    /// Leaving a name
    fn post_order_name(&mut self, id: NodeId, selector: &Selector) {}

    /// Entering a label
    fn pre_order_label(&mut self, id: NodeId, label: &Label) {}
    /// Leaving a label
    fn post_order_label(&mut self, id: NodeId, label: &Label) {}

    /// Entering an interpolator, with the graph available for driving it
    fn pre_order_interpolator(&mut self, graph: &mut SceneGraph, id: NodeId) {}
    /// Leaving an interpolator
    fn post_order_interpolator(&mut self, id: NodeId, interpolator: &Interpolator) {}

    /// Entering a switch
    fn pre_order_switch(&mut self, id: NodeId, switch: &Switch) {}
    /// Leaving a switch
    fn post_order_switch(&mut self, id: NodeId, switch: &Switch) {}
}

/// Depth-first traversal of the tree rooted at `id`
pub fn traverse<V: SceneVisitor + ?Sized>(graph: &mut SceneGraph, id: NodeId, visitor: &mut V) {
    let is_interpolator = match graph.get(id) {
        None => return,
        Some(element) if element.is_destroyed() => return,
        Some(element) => {
            trace!("Visiting {} {id:?}", element.kind.type_name());
            matches!(element.kind, NodeKind::Interpolator(_))
        }
    };

    if is_interpolator {
        visitor.pre_order_interpolator(graph, id);
    } else if let Some(element) = graph.get(id) {
        visit_pre_order(visitor, id, &element.kind);
    }

    for child in graph.traversal_children(id) {
        traverse(graph, child, visitor);
    }

    if let Some(element) = graph.get(id) {
        visit_post_order(visitor, id, &element.kind);
    }
}

fn visit_pre_order<V: SceneVisitor + ?Sized>(visitor: &mut V, id: NodeId, kind: &NodeKind) {
    match kind {
        NodeKind::Group => visitor.pre_order_group(id),
        NodeKind::Environment(environment) => visitor.pre_order_environment(id, environment),
        NodeKind::Layer(layer) => visitor.pre_order_layer(id, layer),
        NodeKind::TransformGroup(group) => visitor.pre_order_transform_group(id, group),
        NodeKind::Geometry(geometry) => visitor.pre_order_geometry(id, geometry),
        NodeKind::Appearance(appearance) => visitor.pre_order_appearance(id, appearance),
        NodeKind::Name(selector) => visitor.pre_order_name(id, selector),
        NodeKind::Label(label) => visitor.pre_order_label(id, label),
        NodeKind::Switch(switch) => visitor.pre_order_switch(id, switch),
        NodeKind::Interpolator(_) => {}
    }
}

fn visit_post_order<V: SceneVisitor + ?Sized>(visitor: &mut V, id: NodeId, kind: &NodeKind) {
    match kind {
        NodeKind::Group => visitor.post_order_group(id),
        NodeKind::Environment(environment) => visitor.post_order_environment(id, environment),
        NodeKind::Layer(layer) => visitor.post_order_layer(id, layer),
        NodeKind::TransformGroup(group) => visitor.post_order_transform_group(id, group),
        NodeKind::Geometry(geometry) => visitor.post_order_geometry(id, geometry),
        NodeKind::Appearance(appearance) => visitor.post_order_appearance(id, appearance),
        NodeKind::Name(selector) => visitor.post_order_name(id, selector),
        NodeKind::Label(label) => visitor.post_order_label(id, label),
        NodeKind::Interpolator(interpolator) => visitor.post_order_interpolator(id, interpolator),
        NodeKind::Switch(switch) => visitor.post_order_switch(id, switch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl SceneVisitor for Recorder {
        fn pre_order_group(&mut self, _id: NodeId) {
            self.events.push("+group".into());
        }

        fn post_order_group(&mut self, _id: NodeId) {
            self.events.push("-group".into());
        }

        fn pre_order_name(&mut self, _id: NodeId, selector: &Selector) {
            self.events.push(format!("+{selector}"));
        }

        fn post_order_name(&mut self, _id: NodeId, selector: &Selector) {
            self.events.push(format!("-{selector}"));
        }
    }

    #[test]
    fn test_pre_and_post_order_nesting() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(NodeKind::Group);
        let a = graph.insert_child(root, Selector::name("a")).unwrap();
        graph.insert_child(a, NodeKind::Group).unwrap();
        graph.insert_child(root, Selector::name("b")).unwrap();

        let mut recorder = Recorder::default();
        graph.traverse(root, &mut recorder);
        assert_eq!(recorder.events, ["+group", "+a", "+group", "-group", "-a", "+b", "-b", "-group"]);
    }

    #[test]
    fn test_destroyed_subtrees_are_skipped() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(NodeKind::Group);
        let a = graph.insert_child(root, Selector::name("a")).unwrap();
        graph.insert_child(a, Selector::name("inner")).unwrap();
        graph.insert_child(root, Selector::name("b")).unwrap();
        graph.destroy(a).unwrap();

        let mut recorder = Recorder::default();
        graph.traverse(root, &mut recorder);
        assert_eq!(recorder.events, ["+group", "+b", "-b", "-group"]);
    }
}
