//! Display-list builder
//!
//! [`DisplayListBuilder`] is the scene visitor that turns a scene graph into
//! display-list primitives. It keeps the traversal state:
//! - a [`MatrixStack`] with one entry per transform group on the current path
//! - the current appearance, pick selector and lighting environment
//! - the fog and shade flags of the open layer
//!
//! Geometry goes through the full pipeline on its way out of the tree:
//! model transforms, view transform, perspective, window mapping, backface
//! culling, shading and fog. Problems with the scene are reported to the
//! [`ErrorHandler`] and the offending element is skipped.

use log::trace;

use super::display_list::DisplayList;
use super::error::{DisplayError, ErrorHandler, LogErrorHandler};
use super::matrix_stack::MatrixStack;
use super::params::RendererParams;
use super::primitive::{PickInfo, Polygon, Text};
use crate::foundation::color::Color;
use crate::foundation::math::{Mat4, Mat4Ext, Point2, Point3, Vec3, Vec4};
use crate::scene::{
    Appearance, Environment, Font, Geometry, Label, Layer, NodeId, SceneGraph, SceneVisitor, Selector,
    TransformGroup,
};

/// Most vertices a single geometry may have
pub const MAX_VERTICES: usize = 400;

/// Scene visitor that fills a [`DisplayList`]
pub struct DisplayListBuilder {
    params: RendererParams,
    view: Mat4,
    x_scale: f64,
    y_scale: f64,
    stack: MatrixStack,
    appearance: Appearance,
    selector: Option<(NodeId, Selector)>,
    environment: Option<(NodeId, Environment)>,
    open_layer: Option<NodeId>,
    fog: bool,
    shade: bool,
    display_list: Option<DisplayList>,
    error_handler: Box<dyn ErrorHandler>,
    view_coords: Vec<Vec4>,
    window_coords: Vec<Point2>,
}

impl DisplayListBuilder {
    /// Create a builder for `params` with no display list attached
    pub fn new(params: RendererParams) -> Self {
        let mut builder = Self {
            params: RendererParams::default(),
            view: Mat4::identity(),
            x_scale: 1.0,
            y_scale: 1.0,
            stack: MatrixStack::new(),
            appearance: Appearance::default(),
            selector: None,
            environment: None,
            open_layer: None,
            fog: false,
            shade: false,
            display_list: None,
            error_handler: Box::new(LogErrorHandler),
            view_coords: Vec::with_capacity(MAX_VERTICES),
            window_coords: Vec::with_capacity(MAX_VERTICES),
        };
        builder.set_params(params);
        builder
    }

    /// Replace the parameters, recomputing the view matrix and window scale
    pub fn set_params(&mut self, params: RendererParams) {
        self.view = Mat4::perspective_divide(params.projection_distance)
            * Mat4::look_at(&params.eye, &params.look, &params.up);
        self.x_scale = f64::from(params.window.width()) / params.volume.width();
        self.y_scale = f64::from(params.window.height()) / params.volume.height();
        self.params = params;
    }

    /// Current parameters
    pub fn params(&self) -> &RendererParams {
        &self.params
    }

    /// Set the scene time handed to interpolators
    pub fn set_elapsed(&mut self, elapsed_ms: u64) {
        self.params.elapsed_ms = elapsed_ms;
    }

    /// Replace the error handler
    pub fn set_error_handler(&mut self, handler: Box<dyn ErrorHandler>) {
        self.error_handler = handler;
    }

    /// Attach the display list that layers are built into
    pub fn attach_display_list(&mut self, display_list: DisplayList) {
        self.display_list = Some(display_list);
    }

    /// Detach and return the display list
    pub fn detach_display_list(&mut self) -> Option<DisplayList> {
        self.display_list.take()
    }

    /// Attached display list
    pub fn display_list(&self) -> Option<&DisplayList> {
        self.display_list.as_ref()
    }

    /// Attached display list, mutably
    pub fn display_list_mut(&mut self) -> Option<&mut DisplayList> {
        self.display_list.as_mut()
    }

    /// Forget all traversal state
    pub fn reset(&mut self) {
        self.stack.clear();
        self.appearance = Appearance::default();
        self.selector = None;
        self.environment = None;
        self.open_layer = None;
        self.fog = false;
        self.shade = false;
    }

    fn report(&mut self, message: &str) {
        self.error_handler.handle_error(message);
    }

    fn to_view(&self, point: &Point3) -> Vec4 {
        self.view * self.stack.transform(point.to_homogeneous())
    }

    fn to_window(&self, p: &Vec4) -> Point2 {
        let window = &self.params.window;
        let volume = &self.params.volume;
        Point2::new(
            window.xmin.saturating_add(((p.x / p.w - volume.xmin) * self.x_scale) as i32),
            window.ymin.saturating_add(((p.y / p.w - volume.ymin) * self.y_scale) as i32),
        )
    }

    fn shaded(&self, color: Color, normal: &Vec3) -> Color {
        self.environment
            .iter()
            .flat_map(|(_, environment)| &environment.lights)
            .fold(color, |color, light| color.add_weighted(light.color, normal.dot(&light.direction())))
    }

    fn fogged(&self, color: Color, depth: f64) -> Color {
        let volume = &self.params.volume;
        let factor = (volume.zmax - depth) / (depth - volume.zmin);
        color.blend_toward(self.params.background, factor)
    }

    fn add_polygon(&mut self, pick_info: PickInfo, depth: f64, polygon: Polygon) {
        let result = match self.display_list.as_mut() {
            Some(list) => list.add_polygon(pick_info, depth, polygon),
            None => Err(DisplayError::NoLayerOpen),
        };
        if let Err(e) = result {
            self.report(&format!("cannot render geometry: {e}"));
        }
    }

    fn add_label(&mut self, pick_info: PickInfo, depth: f64, text: Text) {
        let result = match self.display_list.as_mut() {
            Some(list) => list.add_label(pick_info, depth, text),
            None => Err(DisplayError::NoLayerOpen),
        };
        if let Err(e) = result {
            self.report(&format!("cannot add label: {e}"));
        }
    }

    fn current_selector(&self) -> Option<Selector> {
        self.selector.as_ref().map(|(_, selector)| selector.clone())
    }
}

/// Plane normal of a projected face from its first three vertices
///
/// X and Y are taken after the perspective divide, Z before it.
fn face_normal(a: &Vec4, b: &Vec4, c: &Vec4) -> Vec3 {
    let project = |p: &Vec4| Vec3::new(p.x / p.w, p.y / p.w, p.z);
    let (a, b, c) = (project(a), project(b), project(c));
    (c - b).cross(&(a - b))
}

fn open_layer(list: &mut DisplayList, layer: &Layer) -> Result<(), DisplayError> {
    if !list.layer_exists(&layer.selector) {
        list.create_layer(layer.selector.clone(), layer.depth_sort())?;
    }
    list.open_layer(&layer.selector)
}

impl SceneVisitor for DisplayListBuilder {
    fn pre_order_environment(&mut self, id: NodeId, environment: &Environment) {
        if self.environment.is_some() {
            self.report("nested environments");
            return;
        }
        self.environment = Some((id, environment.clone()));
    }

    fn post_order_environment(&mut self, id: NodeId, _environment: &Environment) {
        if self.environment.as_ref().is_some_and(|(open, _)| *open == id) {
            self.environment = None;
        }
    }

    fn pre_order_layer(&mut self, id: NodeId, layer: &Layer) {
        if self.open_layer.is_some() {
            self.report("nested layers");
            return;
        }
        let Some(list) = self.display_list.as_mut() else {
            self.report("no display list set");
            return;
        };
        match open_layer(list, layer) {
            Ok(()) => {
                trace!("Opened layer {}", layer.selector);
                self.open_layer = Some(id);
                self.fog = layer.fog();
                self.shade = layer.shade();
            }
            Err(e) => self.report(&format!("cannot open layer {}: {e}", layer.selector)),
        }
    }

    fn post_order_layer(&mut self, id: NodeId, _layer: &Layer) {
        match self.open_layer {
            Some(open) if open == id => {
                self.open_layer = None;
                self.fog = false;
                self.shade = false;
                let closed = self.display_list.as_mut().map(DisplayList::close_layer);
                if let Some(Err(e)) = closed {
                    self.report(&format!("cannot close layer: {e}"));
                }
            }
            Some(_) => {}
            None => self.report("no layer open"),
        }
    }

    fn pre_order_transform_group(&mut self, _id: NodeId, group: &TransformGroup) {
        if !self.stack.push(group.local_matrix()) {
            self.report(&format!(
                "transform groups nested deeper than {}; transforms ignored",
                MatrixStack::CAPACITY
            ));
        }
    }

    fn post_order_transform_group(&mut self, _id: NodeId, _group: &TransformGroup) {
        self.stack.pop();
    }

    fn post_order_geometry(&mut self, _id: NodeId, geometry: &Geometry) {
        let vertices = geometry.vertices();
        if vertices.len() > MAX_VERTICES {
            self.report("too many vertices in geometry element");
            return;
        }

        let mut view_coords = std::mem::take(&mut self.view_coords);
        let mut window_coords = std::mem::take(&mut self.window_coords);
        view_coords.clear();
        view_coords.extend(vertices.iter().map(|vertex| self.to_view(vertex)));
        window_coords.clear();
        window_coords.extend(view_coords.iter().map(|p| self.to_window(p)));

        for (index, face) in geometry.faces().iter().enumerate() {
            let indices = &face.vertices;
            if indices.len() < 3 || indices.iter().any(|&v| v >= view_coords.len()) {
                self.report(&format!("face {index} has an invalid vertex list"));
                continue;
            }
            let normal = face_normal(&view_coords[indices[0]], &view_coords[indices[1]], &view_coords[indices[2]]);
            // degenerate faces are edge-on and drawn as nothing
            let Some(normal) = normal.try_normalize(f64::EPSILON) else {
                continue;
            };
            if normal.dot(&Vec3::z()) <= 0.0 {
                continue;
            }

            let points = indices.iter().map(|&v| window_coords[v]).collect();
            let depth = indices
                .iter()
                .map(|&v| view_coords[v].z)
                .fold(f64::INFINITY, f64::min);

            let mut fill = self.appearance.fill;
            let mut edge = self.appearance.edge;
            let mut highlight_fill = self.appearance.highlight_fill;
            let highlight_edge = self.appearance.highlight_edge;
            if self.shade {
                fill = self.shaded(fill, &normal);
                highlight_fill = self.shaded(highlight_fill, &normal);
            }
            if self.fog {
                fill = self.fogged(fill, depth);
                edge = self.fogged(edge, depth);
            }

            let pick_info = PickInfo::new(self.current_selector(), Some(index));
            self.add_polygon(pick_info, depth, Polygon { points, fill, edge, highlight_fill, highlight_edge });
        }

        self.view_coords = view_coords;
        self.window_coords = window_coords;
    }

    fn pre_order_appearance(&mut self, _id: NodeId, appearance: &Appearance) {
        self.appearance = *appearance;
    }

    fn pre_order_name(&mut self, id: NodeId, selector: &Selector) {
        if self.selector.is_some() {
            self.report("name sub-element of other name element");
            return;
        }
        self.selector = Some((id, selector.clone()));
    }

    fn post_order_name(&mut self, id: NodeId, _selector: &Selector) {
        if self.selector.as_ref().is_some_and(|(open, _)| *open == id) {
            self.selector = None;
        }
    }

    fn post_order_label(&mut self, _id: NodeId, label: &Label) {
        let anchor = self.to_view(&Point3::origin());
        // at or behind the center of projection
        if anchor.w <= f64::EPSILON {
            trace!("Label {:?} is behind the eye; skipped", label.text);
            return;
        }
        let position = anchor + Vec4::new(label.offset.x, label.offset.y, label.offset.z, 0.0);
        let depth = position.z;

        let max_size = f64::from(self.params.window.height().max(1));
        let font = Font {
            size: (f64::from(label.font.size) / anchor.w).clamp(0.0, max_size) as u32,
            ..label.font.clone()
        };
        let mut color = self.appearance.fill;
        if self.fog {
            color = self.fogged(color, depth);
        }

        let text = Text {
            anchor: self.to_window(&anchor),
            position: self.to_window(&position),
            text: label.text.clone(),
            font,
            color,
        };
        let pick_info = PickInfo::new(self.current_selector(), None);
        self.add_label(pick_info, depth, text);
    }

    fn pre_order_interpolator(&mut self, graph: &mut SceneGraph, id: NodeId) {
        if let Err(e) = graph.update_interpolator(id, self.params.elapsed_ms) {
            self.report(&format!("cannot update interpolator: {e}"));
        }
    }
}

impl std::fmt::Debug for DisplayListBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayListBuilder")
            .field("params", &self.params)
            .field("depth", &self.stack.depth())
            .field("selector", &self.selector)
            .field("open_layer", &self.open_layer)
            .field("fog", &self.fog)
            .field("shade", &self.shade)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::primitive::Primitive;
    use crate::scene::{Attribute, Face, LightSource, NodeKind, TransformKind};
    use std::sync::{Arc, Mutex};

    fn collecting_builder() -> (DisplayListBuilder, Arc<Mutex<Vec<String>>>) {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        let mut builder = DisplayListBuilder::new(RendererParams::default());
        builder.set_error_handler(Box::new(move |message: &str| {
            sink.lock().unwrap().push(message.to_string());
        }));
        builder.attach_display_list(DisplayList::new());
        (builder, errors)
    }

    fn facing_triangle() -> Geometry {
        Geometry::new(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(50.0, 0.0, 0.0), Point3::new(0.0, 50.0, 0.0)],
            vec![Face::new([0, 1, 2])],
        )
        .unwrap()
    }

    #[test]
    fn test_origin_maps_to_window_center() {
        let builder = DisplayListBuilder::new(RendererParams::default());
        let view = builder.to_view(&Point3::origin());
        assert_eq!(builder.to_window(&view), Point2::new(400, 400));
    }

    #[test]
    fn test_structural_errors_are_reported_and_skipped() {
        let (mut builder, errors) = collecting_builder();
        let mut graph = SceneGraph::new();
        let outer = graph.insert(Layer::new("outer", true, false, false));
        let inner = graph.insert_child(outer, Layer::new("inner", true, false, false)).unwrap();
        let name = graph.insert_child(inner, Selector::name("a")).unwrap();
        let nested = graph.insert_child(name, Selector::name("b")).unwrap();
        graph.insert_child(nested, facing_triangle()).unwrap();

        graph.traverse(outer, &mut builder);
        let errors = errors.lock().unwrap();
        assert_eq!(*errors, ["nested layers", "name sub-element of other name element"]);

        // the triangle still lands in the outer layer, picked by the outer name
        let list = builder.display_list().unwrap();
        let layer = list.layer(&Selector::name("outer")).unwrap();
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.elements()[0].pick_info, PickInfo::new(Some(Selector::name("a")), Some(0)));
    }

    #[test]
    fn test_geometry_outside_layer_is_reported() {
        let (mut builder, errors) = collecting_builder();
        let mut graph = SceneGraph::new();
        let root = graph.insert(facing_triangle());
        graph.traverse(root, &mut builder);
        assert_eq!(errors.lock().unwrap().as_slice(), ["cannot render geometry: no layer open"]);
    }

    #[test]
    fn test_vertex_limit() {
        let (mut builder, errors) = collecting_builder();
        let mut graph = SceneGraph::new();
        let layer = graph.insert(Layer::new("main", false, false, false));
        let vertices = (0..=MAX_VERTICES).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        graph.insert_child(layer, Geometry::new(vertices, vec![]).unwrap()).unwrap();
        graph.traverse(layer, &mut builder);
        assert_eq!(errors.lock().unwrap().as_slice(), ["too many vertices in geometry element"]);
    }

    #[test]
    fn test_shading_adds_light_facing_the_surface() {
        let (mut builder, _errors) = collecting_builder();
        let mut graph = SceneGraph::new();
        let environment = Environment::new().with_light(LightSource::new(Vec3::z(), Color::new(100, 50, 0)));
        let root = graph.insert(environment);
        let layer = graph.insert_child(root, Layer::new("main", false, false, true)).unwrap();
        graph.insert_child(layer, Appearance::new(Color::new(100, 100, 100), Color::BLACK)).unwrap();
        graph.insert_child(layer, facing_triangle()).unwrap();

        graph.traverse(root, &mut builder);
        let list = builder.display_list().unwrap();
        let element = &list.layer(&Selector::name("main")).unwrap().elements()[0];
        let Primitive::Polygon(polygon) = &element.primitive else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.fill, Color::new(200, 150, 100));
        assert_eq!(polygon.edge, Color::BLACK);
    }

    #[test]
    fn test_fog_fades_toward_background() {
        let (mut builder, _errors) = collecting_builder();
        let mut graph = SceneGraph::new();
        let layer = graph.insert(Layer::new("main", false, true, false));
        graph.insert_child(layer, Appearance::new(Color::BLACK, Color::BLACK)).unwrap();
        graph.insert_child(layer, facing_triangle()).unwrap();
        graph.traverse(layer, &mut builder);

        // triangle sits at view depth -200: factor (-100 + 200) / (-200 + 300) = 1
        let list = builder.display_list().unwrap();
        let element = &list.layer(&Selector::name("main")).unwrap().elements()[0];
        assert!((element.depth + 200.0).abs() < 1e-9);
        let Primitive::Polygon(polygon) = &element.primitive else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.fill, Color::WHITE);
    }

    #[test]
    fn test_label_scales_font_with_perspective() {
        let (mut builder, _errors) = collecting_builder();
        let mut graph = SceneGraph::new();
        let layer = graph.insert(Layer::new("labels", false, false, false));
        let font = Font { size: 15, ..Font::default() };
        graph
            .insert_child(layer, Label::new("corner").with_offset(Vec3::new(10.0, 0.0, 0.0)).with_font(font))
            .unwrap();
        graph.traverse(layer, &mut builder);

        let list = builder.display_list().unwrap();
        let element = &list.layer(&Selector::name("labels")).unwrap().elements()[0];
        assert_eq!(element.pick_info, PickInfo::new(None, None));
        let Primitive::Text(text) = &element.primitive else {
            panic!("expected text");
        };
        // w = 1 + (-200 / -500) = 1.4, 15 / 1.4 truncates to 10
        assert_eq!(text.font.size, 10);
        assert_eq!(text.anchor, Point2::new(400, 400));
        assert_eq!(text.position, Point2::new(414, 400));
    }

    fn translated(z: f64) -> TransformGroup {
        TransformGroup::new()
            .with_transform(TransformKind::Translate)
            .unwrap()
            .with_attribute(Attribute::TranslateZ, z)
    }

    #[test]
    fn test_label_near_the_eye_is_clamped_and_behind_it_skipped() {
        let (mut builder, errors) = collecting_builder();
        let mut graph = SceneGraph::new();
        let layer = graph.insert(Layer::new("labels", false, false, false));
        // the center of projection sits at z = 700
        for (z, text) in [(699.99999, "near"), (701.0, "behind"), (750.0, "far behind")] {
            let group = graph.insert_child(layer, translated(z)).unwrap();
            graph
                .insert_child(group, Label::new(text).with_offset(Vec3::new(10.0, 0.0, 0.0)))
                .unwrap();
        }
        graph.traverse(layer, &mut builder);

        assert!(errors.lock().unwrap().is_empty());
        let list = builder.display_list().unwrap();
        let layer = list.layer(&Selector::name("labels")).unwrap();
        assert_eq!(layer.len(), 1);
        let Primitive::Text(text) = &layer.elements()[0].primitive else {
            panic!("expected text");
        };
        assert_eq!(text.text, "near");
        assert_eq!(text.font.size, 800);
        assert_eq!(text.anchor, Point2::new(400, 400));
        assert!(text.position.x > text.anchor.x);
    }

    #[test]
    fn test_transform_overflow_is_reported_and_stack_stays_balanced() {
        let (mut builder, errors) = collecting_builder();
        let mut graph = SceneGraph::new();
        let layer = graph.insert(Layer::new("main", false, false, false));
        let mut parent = layer;
        for _ in 0..=MatrixStack::CAPACITY {
            let group = TransformGroup::new()
                .with_transform(TransformKind::Translate)
                .unwrap()
                .with_attribute(Attribute::TranslateX, 1.0);
            parent = graph.insert_child(parent, group).unwrap();
        }
        graph.insert_child(parent, facing_triangle()).unwrap();
        graph.insert_child(layer, facing_triangle()).unwrap();
        graph.traverse(layer, &mut builder);

        assert_eq!(
            errors.lock().unwrap().as_slice(),
            ["transform groups nested deeper than 100; transforms ignored"]
        );
        assert_eq!(builder.stack.depth(), 0);

        let list = builder.display_list().unwrap();
        let elements = list.layer(&Selector::name("main")).unwrap().elements();
        assert_eq!(elements.len(), 2);
        let first_points: Vec<Point2> = elements
            .iter()
            .map(|element| match &element.primitive {
                Primitive::Polygon(polygon) => polygon.points[0],
                Primitive::Text(_) => panic!("expected a polygon"),
            })
            .collect();
        // only the first 100 translations apply: (100 / 1.4 + 200) * 2
        assert_eq!(first_points[0], Point2::new(542, 400));
        // the sibling sees none of them
        assert_eq!(first_points[1], Point2::new(400, 400));
    }

    #[test]
    fn test_nested_environment_is_reported_and_outer_lights_stay() {
        let (mut builder, errors) = collecting_builder();
        let mut graph = SceneGraph::new();
        let outer = graph.insert(Environment::new().with_light(LightSource::new(Vec3::z(), Color::new(100, 50, 0))));
        let layer = graph.insert_child(outer, Layer::new("main", false, false, true)).unwrap();
        graph.insert_child(layer, Appearance::new(Color::new(100, 100, 100), Color::BLACK)).unwrap();
        let inner = graph
            .insert_child(layer, Environment::new().with_light(LightSource::new(Vec3::z(), Color::new(0, 0, 100))))
            .unwrap();
        graph.insert_child(inner, facing_triangle()).unwrap();
        graph.insert_child(layer, facing_triangle()).unwrap();
        graph.traverse(outer, &mut builder);

        assert_eq!(errors.lock().unwrap().as_slice(), ["nested environments"]);
        let list = builder.display_list().unwrap();
        let fills: Vec<Color> = list
            .layer(&Selector::name("main"))
            .unwrap()
            .elements()
            .iter()
            .filter_map(|element| match &element.primitive {
                Primitive::Polygon(polygon) => Some(polygon.fill),
                Primitive::Text(_) => None,
            })
            .collect();
        // leaving the inner environment keeps the outer one for the sibling
        assert_eq!(fills, [Color::new(200, 150, 100), Color::new(200, 150, 100)]);
    }

    #[test]
    fn test_label_outside_layer_is_reported_and_rendering_continues() {
        let (mut builder, errors) = collecting_builder();
        let mut graph = SceneGraph::new();
        let root = graph.insert(NodeKind::Group);
        graph.insert_child(root, Label::new("stray")).unwrap();
        let layer = graph.insert_child(root, Layer::new("main", false, false, false)).unwrap();
        graph.insert_child(layer, facing_triangle()).unwrap();
        graph.traverse(root, &mut builder);

        assert_eq!(errors.lock().unwrap().as_slice(), ["cannot add label: no layer open"]);
        let list = builder.display_list().unwrap();
        assert_eq!(list.layer(&Selector::name("main")).unwrap().len(), 1);
    }

    #[test]
    fn test_fog_toward_darker_background_darkens() {
        let params = RendererParams { background: Color::BLACK, ..RendererParams::default() };
        let mut builder = DisplayListBuilder::new(params);
        builder.attach_display_list(DisplayList::new());
        let mut graph = SceneGraph::new();
        let layer = graph.insert(Layer::new("main", false, true, false));
        graph.insert_child(layer, Appearance::new(Color::WHITE, Color::BLACK)).unwrap();
        graph.insert_child(layer, facing_triangle()).unwrap();
        graph.traverse(layer, &mut builder);

        let list = builder.display_list().unwrap();
        let Primitive::Polygon(polygon) = &list.layer(&Selector::name("main")).unwrap().elements()[0].primitive else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.fill, Color::BLACK);
    }
}
