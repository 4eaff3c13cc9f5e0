//! Display list
//!
//! Retained output of one traversal: selector-keyed layers in creation
//! order. Layers are opened one at a time while the builder fills them, then
//! the whole list can be drawn, redrawn with different highlights, and
//! picked against without touching the scene again.

use log::debug;

use super::error::DisplayError;
use super::layer::DisplayListLayer;
use super::primitive::{DisplayElement, PickInfo, Polygon, Primitive, Text};
use super::surface::Surface;
use crate::foundation::collections::Pool;
use crate::foundation::math::Point2;
use crate::scene::Selector;

/// Layers of projected primitives
#[derive(Debug, Default)]
pub struct DisplayList {
    layers: Vec<(Selector, DisplayListLayer)>,
    open: Option<usize>,
    pool: Pool<DisplayListLayer>,
}

impl DisplayList {
    /// Empty display list
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, selector: &Selector) -> Option<usize> {
        self.layers.iter().position(|(key, _)| key == selector)
    }

    /// Create a layer after the existing ones
    pub fn create_layer(&mut self, selector: Selector, depth_sort: bool) -> Result<(), DisplayError> {
        if self.layer_exists(&selector) {
            return Err(DisplayError::LayerExists);
        }
        let mut layer = self.pool.acquire(|| DisplayListLayer::new(depth_sort));
        layer.set_depth_sort(depth_sort);
        debug!("Created display layer {selector}");
        self.layers.push((selector, layer));
        Ok(())
    }

    /// Whether a layer with this selector exists
    pub fn layer_exists(&self, selector: &Selector) -> bool {
        self.position(selector).is_some()
    }

    /// Open a layer for adding primitives
    pub fn open_layer(&mut self, selector: &Selector) -> Result<(), DisplayError> {
        if self.open.is_some() {
            return Err(DisplayError::LayerAlreadyOpen);
        }
        self.open = Some(self.position(selector).ok_or(DisplayError::LayerNotFound)?);
        Ok(())
    }

    /// Close the open layer
    pub fn close_layer(&mut self) -> Result<(), DisplayError> {
        self.open.take().map(|_| ()).ok_or(DisplayError::NoLayerOpen)
    }

    /// Remove a layer, returning its buffer to the pool
    pub fn destroy_layer(&mut self, selector: &Selector) -> Result<(), DisplayError> {
        let index = self.position(selector).ok_or(DisplayError::LayerNotFound)?;
        let (_, mut layer) = self.layers.remove(index);
        layer.clear();
        self.pool.release(layer);
        self.open = match self.open {
            Some(open) if open == index => None,
            Some(open) if open > index => Some(open - 1),
            other => other,
        };
        debug!("Destroyed display layer {selector}");
        Ok(())
    }

    /// Remove every layer, returning all buffers to the pool
    pub fn clear(&mut self) {
        for (_, mut layer) in self.layers.drain(..) {
            layer.clear();
            self.pool.release(layer);
        }
        self.open = None;
    }

    /// Empty the open layer
    pub fn clear_layer(&mut self) -> Result<(), DisplayError> {
        self.open_layer_mut()?.clear();
        Ok(())
    }

    fn open_layer_mut(&mut self) -> Result<&mut DisplayListLayer, DisplayError> {
        let index = self.open.ok_or(DisplayError::NoLayerOpen)?;
        Ok(&mut self.layers[index].1)
    }

    /// Add a polygon to the open layer
    pub fn add_polygon(&mut self, pick_info: PickInfo, depth: f64, polygon: Polygon) -> Result<(), DisplayError> {
        self.add(DisplayElement { pick_info, depth, primitive: Primitive::Polygon(polygon) })
    }

    /// Add a label to the open layer
    pub fn add_label(&mut self, pick_info: PickInfo, depth: f64, text: Text) -> Result<(), DisplayError> {
        self.add(DisplayElement { pick_info, depth, primitive: Primitive::Text(text) })
    }

    fn add(&mut self, element: DisplayElement) -> Result<(), DisplayError> {
        self.open_layer_mut()?.add(element);
        Ok(())
    }

    /// Draw every layer in creation order
    pub fn render(&mut self, surface: &mut dyn Surface) {
        for (_, layer) in &mut self.layers {
            layer.render(surface);
        }
    }

    /// Topmost primitive under `point`, searching layers in creation order
    pub fn pick(&self, point: Point2) -> Option<PickInfo> {
        self.layers.iter().find_map(|(_, layer)| layer.pick(point).cloned())
    }

    /// Highlight primitives whose selector is in `selectors`
    pub fn set_highlighted(&mut self, selectors: &[Selector]) {
        for (_, layer) in &mut self.layers {
            layer.set_highlighted(selectors);
        }
    }

    /// Remove every highlight
    pub fn clear_highlighted(&mut self) {
        self.set_highlighted(&[]);
    }

    /// Layer by selector
    pub fn layer(&self, selector: &Selector) -> Option<&DisplayListLayer> {
        self.position(selector).map(|index| &self.layers[index].1)
    }

    /// Layer selectors in creation order
    pub fn layer_selectors(&self) -> impl Iterator<Item = &Selector> {
        self.layers.iter().map(|(selector, _)| selector)
    }

    /// Buffers waiting in the reuse pool
    pub fn pooled_layers(&self) -> usize {
        self.pool.len()
    }
}
