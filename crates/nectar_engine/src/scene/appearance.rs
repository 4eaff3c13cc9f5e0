//! Surface colors

use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;

/// Colors used for geometry and labels that follow in traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    /// Polygon interior
    pub fill: Color,
    /// Polygon outline
    pub edge: Color,
    /// Interior when highlighted
    pub highlight_fill: Color,
    /// Outline when highlighted
    pub highlight_edge: Color,
}

impl Appearance {
    /// Appearance with the given normal colors and default highlight colors
    pub fn new(fill: Color, edge: Color) -> Self {
        Self { fill, edge, ..Self::default() }
    }

    /// Replace the highlight colors
    #[must_use]
    pub fn with_highlight(mut self, fill: Color, edge: Color) -> Self {
        self.highlight_fill = fill;
        self.highlight_edge = edge;
        self
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            fill: Color::WHITE,
            edge: Color::BLACK,
            highlight_fill: Color::YELLOW,
            highlight_edge: Color::BLACK,
        }
    }
}
