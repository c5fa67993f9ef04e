use chunkmap_core::metadata::basemap_path;
use chunkmap_core::tiles::zoom_dir_name;
use chunkmap_core::{GridPosition, PixelCoordinate, TileIndex};
use chunkmap_render::{Background, CompositeOptions, MapImage, RenderError};
use image::{Rgba, RgbaImage};
use std::path::Path;
use tempfile::tempdir;

const RED: Rgba<u8> = Rgba([200, 0, 0, 255]);
const GREEN: Rgba<u8> = Rgba([0, 200, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 200, 255]);
const GRAY: Rgba<u8> = Rgba([90, 90, 90, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn write_tile(dir: &Path, name: &str, color: Rgba<u8>, res: u32) {
    RgbaImage::from_pixel(res, res, color).save(dir.join(name)).unwrap();
}

/// Tiles (0,0), (1,0) and (0,1) of 8px each; (1,1) is missing.
fn three_tiles(dir: &Path) {
    write_tile(dir, "0_0.png", RED, 8);
    write_tile(dir, "1_0.png", GREEN, 8);
    write_tile(dir, "0_1.png", BLUE, 8);
}

fn options(res: u32) -> CompositeOptions {
    CompositeOptions { zoom: 0, tile_resolution: res, ..Default::default() }
}

#[test]
fn missing_tile_stays_background() {
    let _ = env_logger::builder().is_test(true).try_init();
    let tiles = tempdir().unwrap();
    three_tiles(tiles.path());

    let index = TileIndex::collect(tiles.path(), 0).unwrap();
    let map = MapImage::compose(&index, &options(8)).unwrap();

    assert_eq!(map.image.dimensions(), (16, 16));
    assert_eq!(map.metadata.image_count, [2, 2]);
    // row 0 is the bottom band of the raster
    assert_eq!(map.metadata.central_chunk_pixel, PixelCoordinate::new(0, 8));

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(*map.image.get_pixel(x, y + 8), RED);
            assert_eq!(*map.image.get_pixel(x + 8, y + 8), GREEN);
            assert_eq!(*map.image.get_pixel(x, y), BLUE);
            assert_eq!(*map.image.get_pixel(x + 8, y), BLACK);
        }
    }
}

#[test]
fn transparent_background() {
    let tiles = tempdir().unwrap();
    three_tiles(tiles.path());

    let index = TileIndex::collect(tiles.path(), 0).unwrap();
    let opts = CompositeOptions { background: Background::Transparent, ..options(8) };
    let map = MapImage::compose(&index, &opts).unwrap();
    assert_eq!(map.image.get_pixel(12, 4)[3], 0);
}

#[test]
fn grid_overlay_marks_anchor_differently() {
    let tiles = tempdir().unwrap();
    three_tiles(tiles.path());

    let index = TileIndex::collect(tiles.path(), 0).unwrap();
    let map = MapImage::compose(&index, &CompositeOptions { grid: true, ..options(8) }).unwrap();

    assert_eq!(*map.image.get_pixel(0, 8), Rgba([0, 0, 255, 255]));
    assert_eq!(*map.image.get_pixel(5, 8), Rgba([0, 0, 255, 255]));
    assert_eq!(*map.image.get_pixel(8, 12), Rgba([255, 0, 0, 255]));
    assert_eq!(*map.image.get_pixel(0, 3), Rgba([255, 0, 0, 255]));
    assert_eq!(*map.image.get_pixel(3, 11), RED);
}

#[test]
fn create_purges_islands_and_persists() {
    let tiles = tempdir().unwrap();
    let zoom_dir = tiles.path().join(zoom_dir_name(1));
    std::fs::create_dir(&zoom_dir).unwrap();
    // stride is 2 chunks per tile at zoom 1
    write_tile(&zoom_dir, "0_0.png", RED, 4);
    write_tile(&zoom_dir, "2_0.png", GREEN, 4);
    write_tile(&zoom_dir, "20_20.png", GRAY, 4);
    write_tile(&zoom_dir, "readme.png", GRAY, 4);

    let out = tempdir().unwrap();
    let opts = CompositeOptions { zoom: 1, tile_resolution: 4, purge_isolated: true, ..Default::default() };
    let map = MapImage::create(tiles.path(), out.path(), &opts).unwrap();

    assert_eq!(map.image.dimensions(), (8, 4));
    assert_eq!(map.metadata.zoom, 1);
    assert!(MapImage::exists(out.path()));

    let loaded = MapImage::load(out.path()).unwrap();
    assert_eq!(loaded.metadata, map.metadata);
    assert_eq!(loaded.image, map.image);

    let unpurged = MapImage::create(tiles.path(), out.path(), &CompositeOptions { purge_isolated: false, ..opts }).unwrap();
    assert_eq!(unpurged.image.dimensions(), (44, 44));
}

#[test]
fn missing_anchor_is_fatal() {
    let tiles = tempdir().unwrap();
    write_tile(tiles.path(), "1_0.png", RED, 4);
    let out = tempdir().unwrap();
    let err = MapImage::create(tiles.path(), out.path(), &options(4)).unwrap_err();
    assert!(err.to_string().contains("could not be found"));
    assert!(!MapImage::exists(out.path()));
}

#[test]
fn load_detects_stale_basemap() {
    let tiles = tempdir().unwrap();
    three_tiles(tiles.path());
    let out = tempdir().unwrap();
    MapImage::create(tiles.path(), out.path(), &options(8)).unwrap();

    RgbaImage::from_pixel(5, 5, BLACK).save(basemap_path(out.path())).unwrap();
    let err = MapImage::load(out.path()).unwrap_err();
    assert!(matches!(
        err,
        RenderError::MetadataMismatch { expected_width: 16, expected_height: 16, actual_width: 5, actual_height: 5 }
    ));
}

#[test]
fn load_rejects_unreadable_basemap() {
    let tiles = tempdir().unwrap();
    three_tiles(tiles.path());
    let out = tempdir().unwrap();
    MapImage::create(tiles.path(), out.path(), &options(8)).unwrap();

    std::fs::write(basemap_path(out.path()), b"not a png").unwrap();
    assert!(matches!(MapImage::load(out.path()), Err(RenderError::CorruptBasemap { .. })));
}

#[test]
fn anchor_pixel_maps_to_world_reference() {
    let tiles = tempdir().unwrap();
    three_tiles(tiles.path());
    let index = TileIndex::collect(tiles.path(), 0).unwrap();
    let map = MapImage::compose(&index, &options(8)).unwrap();

    assert!(index.contains(&GridPosition::ANCHOR));
    let world = map.to_world(map.metadata.central_chunk_pixel);
    assert_eq!(map.to_pixel(world).unwrap(), map.metadata.central_chunk_pixel);
}
