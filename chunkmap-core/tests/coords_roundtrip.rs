use chunkmap_core::coords::{pixels_per_world_unit, to_pixel_unchecked};
use chunkmap_core::{to_pixel, to_world, MapError, MapMetadata, PixelCoordinate, WorldCoordinate};
use proptest::prelude::*;

fn metadata(zoom: u8, resolution: u32, columns: u32, rows: u32, anchor: (u32, u32)) -> MapMetadata {
    MapMetadata {
        full_resolution: [columns * resolution, rows * resolution],
        chunk_image_resolution: resolution,
        image_count: [columns, rows],
        zoom,
        central_chunk_pixel: PixelCoordinate::new((anchor.0 * resolution) as i32, (anchor.1 * resolution) as i32),
    }
}

fn arb_metadata() -> impl Strategy<Value = MapMetadata> {
    (0u8..=4, prop::sample::select(vec![16u32, 32, 64, 128]), 1u32..8, 1u32..8)
        .prop_flat_map(|(zoom, res, columns, rows)| {
            (Just(zoom), Just(res), Just(columns), Just(rows), 0..columns, 0..rows)
        })
        .prop_map(|(zoom, res, columns, rows, ac, ar)| metadata(zoom, res, columns, rows, (ac, ar)))
}

proptest! {
    /// Property: a pixel mapped to the world and back lands within half a world unit of itself
    #[test]
    fn prop_pixel_world_pixel(meta in arb_metadata(), fx in 0.0f64..1.0, fy in 0.0f64..1.0) {
        let pixel = PixelCoordinate::new(
            (fx * (meta.width() - 1) as f64) as i32,
            (fy * (meta.height() - 1) as f64) as i32,
        );
        let rate = pixels_per_world_unit(meta.zoom, meta.chunk_image_resolution);
        let (x, y) = to_pixel_unchecked(to_world(pixel, &meta), &meta);
        prop_assert!((x - pixel.x as f64).abs() <= rate / 2.0 + 1e-9);
        prop_assert!((y - pixel.y as f64).abs() <= rate / 2.0 + 1e-9);
    }

    /// Property: at fine scales the pixel round trip is exact
    #[test]
    fn prop_pixel_roundtrip_exact_when_zoomed_out(
        meta in arb_metadata().prop_filter("sub-pixel world units", |m| {
            pixels_per_world_unit(m.zoom, m.chunk_image_resolution) < 1.0
        }),
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
    ) {
        let pixel = PixelCoordinate::new(
            (fx * (meta.width() - 1) as f64) as i32,
            (fy * (meta.height() - 1) as f64) as i32,
        );
        prop_assert_eq!(to_pixel(to_world(pixel, &meta), &meta).unwrap(), pixel);
    }

    /// Property: a world point inside the raster comes back within one pixel's worth of world units
    #[test]
    fn prop_world_pixel_world(meta in arb_metadata(), fx in 0.0f64..1.0, fy in 0.0f64..1.0) {
        let rate = pixels_per_world_unit(meta.zoom, meta.chunk_image_resolution);
        let corner = to_world(PixelCoordinate::new(0, 0), &meta);
        let world = WorldCoordinate::new(
            corner.x + (fx * (meta.width() - 1) as f64 / rate) as i32 + 1,
            corner.y + (fy * (meta.height() - 1) as f64 / rate) as i32 + 1,
        );
        if let Ok(pixel) = to_pixel(world, &meta) {
            let back = to_world(pixel, &meta);
            let tolerance = (0.5 / rate).ceil() as i32;
            prop_assert!((back.x - world.x).abs() <= tolerance);
            prop_assert!((back.y - world.y).abs() <= tolerance);
        }
    }
}

#[test]
fn anchor_tile_corner_is_world_reference() {
    let meta = metadata(2, 64, 5, 3, (2, 1));
    assert_eq!(to_world(meta.central_chunk_pixel, &meta), WorldCoordinate::new(0, -64));
}

#[test]
fn points_outside_the_raster_are_rejected() {
    let meta = metadata(0, 64, 2, 2, (0, 0));
    // one pixel per world unit: the raster covers world x in [0, 127]
    assert!(to_pixel(WorldCoordinate::new(127, -64), &meta).is_ok());
    assert!(matches!(
        to_pixel(WorldCoordinate::new(128, -64), &meta),
        Err(MapError::OutOfBounds { .. })
    ));
    assert!(matches!(
        to_pixel(WorldCoordinate::new(-1, -64), &meta),
        Err(MapError::OutOfBounds { .. })
    ));
}
