//! Switch nodes

use super::element::NodeId;

/// Exposes at most one of its children to traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Switch {
    pub(crate) selected: Option<NodeId>,
}

impl Switch {
    /// Switch with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected child
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }
}
