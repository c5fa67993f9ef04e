use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// A position in world units (blocks). Unbounded in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldCoordinate {
    pub x: i32,
    pub y: i32,
}

impl WorldCoordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for WorldCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A position in raster space, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub x: i32,
    pub y: i32,
}

impl PixelCoordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Sub for PixelCoordinate {
    type Output = PixelCoordinate;

    fn sub(self, other: PixelCoordinate) -> PixelCoordinate {
        PixelCoordinate::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for PixelCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A tile slot in the stitched grid, in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub column: i32,
    pub row: i32,
}

impl GridPosition {
    /// The anchor tile. Its pixel placement fixes the world/pixel correspondence.
    pub const ANCHOR: GridPosition = GridPosition { column: 0, row: 0 };

    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// The eight surrounding grid positions (axis neighbours first, then diagonals).
    pub fn neighbours(&self) -> [GridPosition; 8] {
        let (c, r) = (self.column, self.row);
        [
            GridPosition::new(c + 1, r),
            GridPosition::new(c - 1, r),
            GridPosition::new(c, r + 1),
            GridPosition::new(c, r - 1),
            GridPosition::new(c + 1, r + 1),
            GridPosition::new(c + 1, r - 1),
            GridPosition::new(c - 1, r + 1),
            GridPosition::new(c - 1, r - 1),
        ]
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.column, self.row)
    }
}

/// Which axis a boundary segment runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Constant y, spans x.
    Horizontal,
    /// Constant x, spans y.
    Vertical,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "y"),
            Orientation::Vertical => write!(f, "x"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_subtraction() {
        let a = PixelCoordinate::new(10, 4);
        let b = PixelCoordinate::new(3, 7);
        assert_eq!(a - b, PixelCoordinate::new(7, -3));
    }

    #[test]
    fn test_neighbours_are_distinct() {
        let n = GridPosition::new(2, -1).neighbours();
        let set: std::collections::HashSet<_> = n.iter().collect();
        assert_eq!(set.len(), 8);
        assert!(!set.contains(&GridPosition::new(2, -1)));
    }
}
