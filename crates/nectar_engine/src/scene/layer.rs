//! Layer nodes

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::selector::Selector;

bitflags! {
    /// Render flags a layer applies to its subtree
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LayerFlags: u8 {
        /// Sort primitives by depth before drawing
        const DEPTH_SORT = 0b0000_0001;
        /// Blend colors toward the background with distance
        const FOG        = 0b0000_0010;
        /// Apply the environment's lights
        const SHADE      = 0b0000_0100;
    }
}

/// A named partition of the display list and its render flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Display-list key
    pub selector: Selector,
    /// Render flags
    pub flags: LayerFlags,
}

impl Layer {
    /// Create a layer from individual flags
    pub fn new(selector: impl Into<Selector>, depth_sort: bool, fog: bool, shade: bool) -> Self {
        let mut flags = LayerFlags::empty();
        flags.set(LayerFlags::DEPTH_SORT, depth_sort);
        flags.set(LayerFlags::FOG, fog);
        flags.set(LayerFlags::SHADE, shade);
        Self { selector: selector.into(), flags }
    }

    /// Whether primitives are depth sorted
    pub fn depth_sort(&self) -> bool {
        self.flags.contains(LayerFlags::DEPTH_SORT)
    }

    /// Whether fog is applied
    pub fn fog(&self) -> bool {
        self.flags.contains(LayerFlags::FOG)
    }

    /// Whether shading is applied
    pub fn shade(&self) -> bool {
        self.flags.contains(LayerFlags::SHADE)
    }
}
