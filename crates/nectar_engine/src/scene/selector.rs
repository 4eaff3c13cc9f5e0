//! Pick and highlight identities
//!
//! A [`Selector`] names a pickable part of the scene. Name nodes stamp their
//! selector on every primitive emitted below them, layers use one as their
//! display-list key, and highlighting matches rendered primitives against a
//! set of selectors.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Integer cell coordinate in a 3D grid of named objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// Slice
    pub z: i32,
}

/// Totally ordered identity used for picking, highlighting and layer names
///
/// Selectors of the same variant compare by their payload (grid coordinates
/// lexicographically x, then y, then z). Selectors of different variants
/// never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// String key
    Name(String),
    /// Grid cell
    Grid(GridCoord),
    /// Numeric key
    Id(u64),
}

impl Selector {
    /// String-keyed selector
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Grid-cell selector
    pub const fn grid(x: i32, y: i32, z: i32) -> Self {
        Self::Grid(GridCoord { x, y, z })
    }

    /// Three-way comparison
    pub fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    /// Whether this selector matches any selector in `set`
    pub fn matches_any(&self, set: &[Self]) -> bool {
        set.iter().any(|candidate| self.compare(candidate) == Ordering::Equal)
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<GridCoord> for Selector {
    fn from(coord: GridCoord) -> Self {
        Self::Grid(coord)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Grid(GridCoord { x, y, z }) => write!(f, "({x}, {y}, {z})"),
            Self::Id(id) => write!(f, "#{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_selectors_order_lexicographically() {
        let a = Selector::grid(0, 2, 2);
        let b = Selector::grid(1, 0, 0);
        let c = Selector::grid(1, 0, 1);
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(c.compare(&b), Ordering::Greater);
        assert_eq!(b.compare(&Selector::grid(1, 0, 0)), Ordering::Equal);
    }

    #[test]
    fn test_matches_any() {
        let set = [Selector::name("front"), Selector::grid(1, 1, 1)];
        assert!(Selector::grid(1, 1, 1).matches_any(&set));
        assert!(Selector::from("front").matches_any(&set));
        assert!(!Selector::Id(7).matches_any(&set));
        assert!(!Selector::name("back").matches_any(&[]));
    }
}
