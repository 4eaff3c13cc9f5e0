//! Retained scene graph
//!
//! The scene is a tree of [`SceneElement`]s stored in a [`SceneGraph`]
//! arena. Node data is a [`NodeKind`]; a [`SceneVisitor`] receives a
//! callback per kind as [`SceneGraph::traverse`] walks the tree.
//!
//! ## Node kinds
//!
//! - [`Environment`]: directional lights
//! - [`Layer`]: display-list partition with depth-sort, fog and shade flags
//! - [`TransformGroup`]: ordered rotate/translate/scale transforms
//! - [`Geometry`]: vertices and faces, including [`Geometry::cuboid`]
//! - [`Appearance`]: fill, edge and highlight colors
//! - [`Selector`] as a name node: pick identity for everything below
//! - [`Label`]: text anchored in 3D
//! - [`Interpolator`]: keyframe animation of a parent attribute
//! - [`Switch`]: exposes one selected child

mod appearance;
mod element;
mod environment;
mod error;
mod geometry;
mod graph;
mod interpolator;
mod label;
mod layer;
mod mutex;
mod selector;
mod switch;
mod transform_group;
mod visitor;

pub use appearance::Appearance;
pub use element::{ElementState, NodeId, NodeKind, SceneElement, SceneObserver};
pub use environment::{Environment, LightSource};
pub use error::SceneError;
pub use geometry::{Face, Geometry};
pub use graph::SceneGraph;
pub use interpolator::{Interpolator, InterpolatorState, InterpolatorStep};
pub use label::{Font, Label};
pub use layer::{Layer, LayerFlags};
pub use mutex::{SceneMutex, SceneMutexGuard};
pub use selector::{GridCoord, Selector};
pub use switch::Switch;
pub use transform_group::{Attribute, AttributeGroup, TransformGroup, TransformKind};
pub use visitor::{traverse, SceneVisitor};
