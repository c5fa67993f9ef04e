//! Chunkmap Core Library
//!
//! World/pixel coordinate transform, tile indexing, island filtering and
//! area outline geometry for stitched chunk maps.

pub mod types;
pub mod error;
pub mod coords;
pub mod metadata;
pub mod tiles;
pub mod island;
pub mod area;
pub mod markers;
pub mod source;

// Re-export commonly used types and functions
pub use types::{GridPosition, Orientation, PixelCoordinate, WorldCoordinate};
pub use error::{GeometryError, MapError, MapResult};
pub use coords::{to_pixel, to_world};
pub use metadata::MapMetadata;
pub use tiles::{GridBounds, TileIndex, TileReference};
pub use area::{AreaOutline, BoundarySegment};
pub use markers::{Color, Marker, MarkerSet, MarkerType};
pub use source::{InMemoryTileSource, TileRow, TileSource};

/// Version information for the chunkmap core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
