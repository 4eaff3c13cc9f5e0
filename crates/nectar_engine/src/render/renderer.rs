//! Renderer entry points
//!
//! A [`Renderer`] couples a [`DisplayListBuilder`] with the display list it
//! fills. A full render clears the list, traverses the scene and draws the
//! result; a re-render draws the retained list again, which is how
//! highlighting changes are shown without touching the scene.

use log::trace;

use super::builder::DisplayListBuilder;
use super::display_list::DisplayList;
use super::error::ErrorHandler;
use super::params::RendererParams;
use super::primitive::PickInfo;
use super::surface::Surface;
use crate::foundation::math::Point2;
use crate::scene::{NodeId, SceneGraph, Selector};

/// Traverses scenes into a retained display list and draws it
#[derive(Debug)]
pub struct Renderer {
    builder: DisplayListBuilder,
    highlighted: Vec<Selector>,
}

impl Renderer {
    /// Create a renderer with its own copy of `params`
    pub fn new(params: RendererParams) -> Self {
        let mut builder = DisplayListBuilder::new(params);
        builder.attach_display_list(DisplayList::new());
        Self { builder, highlighted: Vec::new() }
    }

    /// Replace the parameters
    pub fn set_params(&mut self, params: RendererParams) {
        self.builder.set_params(params);
    }

    /// Current parameters
    pub fn params(&self) -> &RendererParams {
        self.builder.params()
    }

    /// Replace the handler that receives scene errors found while rendering
    pub fn set_error_handler(&mut self, handler: impl ErrorHandler + 'static) {
        self.builder.set_error_handler(Box::new(handler));
    }

    /// Rebuild the display list from `root` and draw it
    pub fn render(&mut self, graph: &mut SceneGraph, root: NodeId, surface: &mut dyn Surface) {
        trace!("Rendering scene at {} ms", self.builder.params().elapsed_ms);
        if let Some(list) = self.builder.display_list_mut() {
            list.clear();
        }
        self.builder.reset();
        graph.traverse(root, &mut self.builder);

        if let Some(list) = self.builder.display_list_mut() {
            list.set_highlighted(&self.highlighted);
            list.render(surface);
        }
    }

    /// [`render`](Self::render) with the scene time set to `elapsed_ms` first
    pub fn render_at(&mut self, graph: &mut SceneGraph, root: NodeId, surface: &mut dyn Surface, elapsed_ms: u64) {
        self.builder.set_elapsed(elapsed_ms);
        self.render(graph, root, surface);
    }

    /// Draw the last display list again
    pub fn re_render(&mut self, surface: &mut dyn Surface) {
        if let Some(list) = self.builder.display_list_mut() {
            list.render(surface);
        }
    }

    /// Topmost primitive at a window position
    pub fn pick(&self, point: Point2) -> Option<PickInfo> {
        self.builder.display_list().and_then(|list| list.pick(point))
    }

    /// Draw primitives named by `selectors` with highlight colors from now on
    pub fn highlight(&mut self, selectors: &[Selector]) {
        self.highlighted = selectors.to_vec();
        if let Some(list) = self.builder.display_list_mut() {
            list.set_highlighted(selectors);
        }
    }

    /// Stop highlighting
    pub fn unhighlight(&mut self) {
        self.highlighted.clear();
        if let Some(list) = self.builder.display_list_mut() {
            list.clear_highlighted();
        }
    }

    /// Forget the display list; a re-render draws nothing until the next render
    pub fn clear(&mut self) {
        self.builder.reset();
        if let Some(list) = self.builder.display_list_mut() {
            list.clear();
        }
    }

    /// Retained display list
    pub fn display_list(&self) -> Option<&DisplayList> {
        self.builder.display_list()
    }
}
