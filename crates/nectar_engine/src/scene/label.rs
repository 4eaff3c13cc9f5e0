//! Text labels

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Font request for a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    /// Family name, interpreted by the output surface
    pub family: String,
    /// Style name such as `"plain"` or `"bold"`
    pub style: String,
    /// Size in points at unit perspective
    pub size: u32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "SansSerif".to_string(),
            style: "plain".to_string(),
            size: 12,
        }
    }
}

/// Text drawn at a 3D position
///
/// The text baseline starts at the node's local origin displaced by
/// `offset`; the font shrinks with perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Text to draw
    pub text: String,
    /// Local-space displacement of the text anchor
    pub offset: Vec3,
    /// Font
    pub font: Font,
}

impl Label {
    /// Label with no offset and the default font
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset: Vec3::zeros(),
            font: Font::default(),
        }
    }

    /// Set the anchor offset
    #[must_use]
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Set the font
    #[must_use]
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }
}
