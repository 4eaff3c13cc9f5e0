//! A single display-list layer

use super::primitive::{DisplayElement, PickInfo};
use super::surface::Surface;
use crate::foundation::math::Point2;
use crate::scene::Selector;

/// Ordered primitive buffer with lazy depth sorting
///
/// Adding to a depth-sorted layer marks it unsorted; the sort happens once,
/// ascending by depth, on the next draw. Farther primitives therefore come
/// first and nearer ones are painted over them.
#[derive(Debug, Default)]
pub struct DisplayListLayer {
    elements: Vec<DisplayElement>,
    depth_sort: bool,
    sort_pending: bool,
    highlighted: Vec<Selector>,
}

impl DisplayListLayer {
    /// Empty layer
    pub fn new(depth_sort: bool) -> Self {
        Self { depth_sort, ..Self::default() }
    }

    /// Enable or disable depth sorting
    pub fn set_depth_sort(&mut self, depth_sort: bool) {
        self.depth_sort = depth_sort;
    }

    /// Whether the layer is depth sorted
    pub fn depth_sort(&self) -> bool {
        self.depth_sort
    }

    /// Drop every primitive and highlight, keeping the allocation
    pub fn clear(&mut self) {
        self.elements.clear();
        self.highlighted.clear();
        self.sort_pending = false;
    }

    /// Append a primitive
    pub fn add(&mut self, element: DisplayElement) {
        self.elements.push(element);
        if self.depth_sort {
            self.sort_pending = true;
        }
    }

    /// Primitives in their current order
    pub fn elements(&self) -> &[DisplayElement] {
        &self.elements
    }

    /// Number of primitives
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the layer holds no primitives
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Selectors drawn with highlight colors
    pub fn set_highlighted(&mut self, selectors: &[Selector]) {
        self.highlighted.clear();
        self.highlighted.extend_from_slice(selectors);
    }

    /// Draw every primitive in order, sorting first if needed
    pub fn render(&mut self, surface: &mut dyn Surface) {
        if self.depth_sort && self.sort_pending {
            self.elements.sort_unstable_by(|a, b| a.depth.total_cmp(&b.depth));
            self.sort_pending = false;
        }
        for element in &self.elements {
            let highlight = element
                .pick_info
                .selector
                .as_ref()
                .is_some_and(|selector| selector.matches_any(&self.highlighted));
            element.draw(surface, highlight);
        }
    }

    /// Topmost primitive under `point`
    ///
    /// Later primitives are drawn over earlier ones, so the search runs from
    /// the end.
    pub fn pick(&self, point: Point2) -> Option<&PickInfo> {
        self.elements
            .iter()
            .rev()
            .find(|element| element.hit_test(point))
            .map(|element| &element.pick_info)
    }
}
