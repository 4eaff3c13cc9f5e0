//! Display-list primitives
//!
//! Primitives are fully projected: window coordinates, resolved colors and
//! the depth used for sorting. Each carries the [`PickInfo`] of the scene
//! element that produced it.

use std::f64::consts::PI;

use super::surface::Surface;
use crate::foundation::color::Color;
use crate::foundation::math::Point2;
use crate::scene::{Font, Selector};

/// Identity of a picked primitive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PickInfo {
    /// Selector of the enclosing name node, if any
    pub selector: Option<Selector>,
    /// Index of the primitive within its element, such as a face index
    pub primitive: Option<usize>,
}

impl PickInfo {
    /// Pick info for a sub-primitive of a named element
    pub fn new(selector: Option<Selector>, primitive: Option<usize>) -> Self {
        Self { selector, primitive }
    }
}

/// A projected polygon
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Window-space vertices
    pub points: Vec<Point2>,
    /// Interior color
    pub fill: Color,
    /// Outline color
    pub edge: Color,
    /// Interior color when highlighted
    pub highlight_fill: Color,
    /// Outline color when highlighted
    pub highlight_edge: Color,
}

impl Polygon {
    /// Winding-number test using the sum of signed angles around `point`
    ///
    /// The point is inside when the angles subtended by the edges add up to
    /// at least half a turn in magnitude.
    pub fn contains(&self, point: Point2) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let mut total = 0.0;
        for (i, a) in self.points.iter().enumerate() {
            let b = self.points[(i + 1) % self.points.len()];
            let (x1, y1) = (f64::from(a.x - point.x), f64::from(a.y - point.y));
            let (x2, y2) = (f64::from(b.x - point.x), f64::from(b.y - point.y));
            let dot = x1 * x2 + y1 * y2;
            let cross = x1 * y2 - y1 * x2;
            total += cross.atan2(dot);
        }
        total.abs() >= PI
    }
}

/// Text with a leader line back to its anchor
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Window position of the labelled point
    pub anchor: Point2,
    /// Window position of the text baseline
    pub position: Point2,
    /// Text
    pub text: String,
    /// Font, already scaled for perspective
    pub font: Font,
    /// Text color
    pub color: Color,
}

/// Primitive geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Filled and outlined polygon
    Polygon(Polygon),
    /// Text label
    Text(Text),
}

/// A primitive in a display-list layer
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayElement {
    /// Identity reported by picking
    pub pick_info: PickInfo,
    /// View-space depth used for sorting
    pub depth: f64,
    /// What to draw
    pub primitive: Primitive,
}

impl DisplayElement {
    /// Draw onto `surface`, using highlight colors if asked
    pub fn draw(&self, surface: &mut dyn Surface, highlight: bool) {
        match &self.primitive {
            Primitive::Polygon(polygon) => {
                let (fill, edge) = if highlight {
                    (polygon.highlight_fill, polygon.highlight_edge)
                } else {
                    (polygon.fill, polygon.edge)
                };
                surface.fill_polygon(&polygon.points, fill);
                surface.draw_polygon(&polygon.points, edge);
            }
            Primitive::Text(text) => {
                let color = if highlight { text.color.brighter().brighter() } else { text.color };
                surface.draw_text(&text.text, text.position, &text.font, color);
                surface.draw_line(text.anchor, text.position, color);
            }
        }
    }

    /// Whether `point` hits this primitive; text is never hit
    pub fn hit_test(&self, point: Point2) -> bool {
        match &self.primitive {
            Primitive::Polygon(polygon) => polygon.contains(point),
            Primitive::Text(_) => false,
        }
    }
}
