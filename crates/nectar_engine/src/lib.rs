//! # Nectar Engine
//!
//! A retained-mode software 3D renderer built around a scene graph.
//!
//! ## Features
//!
//! - **Scene graph**: arena of nodes with deferred destruction and observers
//! - **Visitor traversal**: per-kind pre/post-order callbacks with a matrix stack
//! - **Software pipeline**: perspective projection, backface culling, flat
//!   shading and depth fog
//! - **Display lists**: depth-sorted layers that redraw, highlight and pick
//!   without traversing the scene again
//! - **Animation**: keyframe interpolators that remove themselves when done
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nectar_engine::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let layer = graph.insert(Layer::new("main", true, false, false));
//! let name = graph.insert_child(layer, Selector::name("box"))?;
//! graph.insert_child(name, Geometry::cuboid(40.0, 40.0, 40.0))?;
//!
//! let mut renderer = Renderer::new(RendererParams::default());
//! let mut frame = Framebuffer::new(800, 800, Color::WHITE);
//! renderer.render(&mut graph, layer, &mut frame);
//! let picked = renderer.pick(Point2::new(400, 400));
//! # Ok::<(), SceneError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::{
            color::Color,
            math::{Mat4, Point2, Point3, Vec3, Volume3, Window2},
        },
        render::{
            ErrorHandler, Framebuffer, PickInfo, RecordingSurface, Renderer, RendererParams, SceneView,
            SceneViewEvent, Surface,
        },
        scene::{
            Appearance, Attribute, AttributeGroup, Environment, Geometry, Interpolator, Label, Layer,
            LightSource, NodeId, NodeKind, SceneError, SceneGraph, SceneObserver, Selector, Switch,
            TransformGroup, TransformKind,
        },
    };
}
