//! World <-> pixel coordinate transform.
//!
//! Every function takes the map metadata explicitly; nothing here holds state.

use crate::error::{MapError, MapResult};
use crate::metadata::MapMetadata;
use crate::types::{PixelCoordinate, WorldCoordinate};

/// World units spanned by one chunk.
pub const CHUNK_SIZE: i32 = 16;

/// World point that lands on the anchor tile's top-left pixel.
/// The vertical component is the map's vertical datum.
pub const WORLD_REFERENCE: WorldCoordinate = WorldCoordinate::new(0, -64);

pub const MAX_ZOOM: u8 = 4;

/// Reject zoom levels above [`MAX_ZOOM`].
pub fn check_zoom(zoom: u8) -> MapResult<u8> {
    if zoom > MAX_ZOOM {
        return Err(MapError::InvalidZoom { zoom });
    }
    Ok(zoom)
}

/// Chunks rendered along one axis of a tile image at `zoom`.
/// Saturates instead of overflowing for zoom levels no map can have.
pub fn chunks_per_tile_axis(zoom: u8) -> u32 {
    1u32.checked_shl(zoom as u32 + 2).unwrap_or(u32::MAX)
}

/// Chunk-coordinate distance between neighbouring tile files at `zoom`.
pub fn tile_stride(zoom: u8) -> i32 {
    1i32.checked_shl(zoom as u32).filter(|s| *s > 0).unwrap_or(i32::MAX)
}

/// Pixels per world unit for a tile of `tile_resolution` pixels at `zoom`.
pub fn pixels_per_world_unit(zoom: u8, tile_resolution: u32) -> f64 {
    tile_resolution as f64 / (chunks_per_tile_axis(zoom) as f64 * CHUNK_SIZE as f64)
}

/// World position of the raster's top-left corner, unrounded.
fn raster_corner(metadata: &MapMetadata) -> (f64, f64) {
    let rate = pixels_per_world_unit(metadata.zoom, metadata.chunk_image_resolution);
    let anchor = metadata.central_chunk_pixel;
    (
        WORLD_REFERENCE.x as f64 - anchor.x as f64 / rate,
        WORLD_REFERENCE.y as f64 - anchor.y as f64 / rate,
    )
}

/// Unrounded pixel position of `world`, without bounds checking.
pub fn to_pixel_unchecked(world: WorldCoordinate, metadata: &MapMetadata) -> (f64, f64) {
    let rate = pixels_per_world_unit(metadata.zoom, metadata.chunk_image_resolution);
    let (corner_x, corner_y) = raster_corner(metadata);
    (
        (world.x as f64 - corner_x) * rate,
        (world.y as f64 - corner_y) * rate,
    )
}

/// Map a world coordinate onto the basemap raster.
///
/// Fails with [`MapError::OutOfBounds`] when the unrounded position falls
/// outside `[0, width - 1] x [0, height - 1]`.
pub fn to_pixel(world: WorldCoordinate, metadata: &MapMetadata) -> MapResult<PixelCoordinate> {
    check_zoom(metadata.zoom)?;
    let (x, y) = to_pixel_unchecked(world, metadata);
    let (width, height) = (metadata.width(), metadata.height());

    let inside = |v: f64, full: u32| full > 0 && 0.0 <= v && v <= (full - 1) as f64;
    if !(inside(x, width) && inside(y, height)) {
        return Err(MapError::OutOfBounds { x, y, width, height });
    }

    Ok(PixelCoordinate::new(x.round() as i32, y.round() as i32))
}

/// Inverse of [`to_pixel`], rounded to the nearest world unit.
pub fn to_world(pixel: PixelCoordinate, metadata: &MapMetadata) -> WorldCoordinate {
    let rate = pixels_per_world_unit(metadata.zoom, metadata.chunk_image_resolution);
    let (corner_x, corner_y) = raster_corner(metadata);
    WorldCoordinate::new(
        (corner_x + pixel.x as f64 / rate).round() as i32,
        (corner_y + pixel.y as f64 / rate).round() as i32,
    )
}
