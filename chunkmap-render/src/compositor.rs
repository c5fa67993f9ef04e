//! Stitching tiles into a single basemap raster.

use image::{imageops, Rgba, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use chunkmap_core::coords;
use chunkmap_core::island::purge_isolated;
use chunkmap_core::metadata::{basemap_path, metadata_path};
use chunkmap_core::{GridPosition, MapError, MapMetadata, PixelCoordinate, TileIndex, WorldCoordinate};

use crate::error::{RenderError, RenderResult};

const ANCHOR_GRID_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);
const GRID_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Fill for raster regions no tile covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    Black,
    Transparent,
}

impl Background {
    pub fn color(&self) -> Rgba<u8> {
        match self {
            Background::Black => Rgba([0, 0, 0, 255]),
            Background::Transparent => Rgba([0, 0, 0, 0]),
        }
    }
}

impl std::str::FromStr for Background {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Background::Black),
            "transparent" => Ok(Background::Transparent),
            other => Err(format!("unknown background '{}', expected black or transparent", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompositeOptions {
    pub zoom: u8,
    /// Edge length of each square tile image in pixels.
    pub tile_resolution: u32,
    pub background: Background,
    /// Mark every tile's top and left edge.
    pub grid: bool,
    /// Drop tiles not connected to the anchor before stitching.
    pub purge_isolated: bool,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            zoom: coords::MAX_ZOOM,
            tile_resolution: 128,
            background: Background::Black,
            grid: false,
            purge_isolated: false,
        }
    }
}

/// A stitched basemap together with the metadata that positions it in the world.
#[derive(Debug, Clone)]
pub struct MapImage {
    pub image: RgbaImage,
    pub metadata: MapMetadata,
}

impl MapImage {
    /// Collect tiles from `tiles_dir`, stitch them and persist the result in `output_dir`.
    pub fn create(tiles_dir: &Path, output_dir: &Path, options: &CompositeOptions) -> RenderResult<Self> {
        let mut index = TileIndex::collect(tiles_dir, options.zoom)?;
        if options.purge_isolated {
            index = purge_isolated(index, GridPosition::ANCHOR)?;
        }

        let map = Self::compose(&index, options)?;
        map.save(output_dir)?;
        Ok(map)
    }

    /// Stitch every tile of `index` into one raster.
    pub fn compose(index: &TileIndex, options: &CompositeOptions) -> RenderResult<Self> {
        coords::check_zoom(index.zoom())?;
        if !index.contains(&GridPosition::ANCHOR) {
            return Err(MapError::MissingAnchor.into());
        }
        let bounds = index.bounds().ok_or(MapError::MissingAnchor)?;

        let res = options.tile_resolution;
        let (width, height) = (bounds.columns() * res, bounds.rows() * res);
        if res == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        log::info!(
            "Stitching {} tiles into a {}x{} raster ({}x{} tiles of {}px)",
            index.len(),
            width,
            height,
            bounds.columns(),
            bounds.rows(),
            res
        );

        let placement = |position: GridPosition| {
            let column = position.column - bounds.min_column;
            let row = position.row - bounds.min_row;
            // rows grow upwards in the raster
            PixelCoordinate::new(column * res as i32, height as i32 - (row + 1) * res as i32)
        };

        let refs: Vec<(GridPosition, PathBuf)> = index
            .present()
            .filter_map(|r| r.path.map(|p| (r.position, p)))
            .collect();
        let decoded: Vec<(GridPosition, RgbaImage)> = refs
            .par_iter()
            .map(|(position, path)| -> RenderResult<(GridPosition, RgbaImage)> {
                let tile = image::open(path)
                    .map_err(|source| RenderError::TileDecode { path: path.clone(), source })?
                    .to_rgba8();
                Ok((*position, tile))
            })
            .collect::<RenderResult<Vec<_>>>()?;

        let mut canvas = RgbaImage::from_pixel(width, height, options.background.color());
        let mut central_chunk_pixel = PixelCoordinate::new(0, 0);

        for (position, mut tile) in decoded {
            if tile.width() != res || tile.height() != res {
                log::warn!(
                    "Tile {} is {}x{}, expected {}x{}; it is clipped to its slot",
                    position,
                    tile.width(),
                    tile.height(),
                    res,
                    res
                );
                tile = imageops::crop_imm(&tile, 0, 0, res.min(tile.width()), res.min(tile.height())).to_image();
            }

            let is_anchor = position == GridPosition::ANCHOR;
            if options.grid {
                draw_grid(&mut tile, if is_anchor { ANCHOR_GRID_COLOR } else { GRID_COLOR });
            }

            let at = placement(position);
            log::debug!("Placing tile {} at {}", position, at);
            imageops::replace(&mut canvas, &tile, at.x as i64, at.y as i64);

            if is_anchor {
                central_chunk_pixel = at;
            }
        }

        let metadata = MapMetadata {
            full_resolution: [width, height],
            chunk_image_resolution: res,
            image_count: [bounds.columns(), bounds.rows()],
            zoom: index.zoom(),
            central_chunk_pixel,
        };
        Ok(Self { image: canvas, metadata })
    }

    /// Write `basemap.png` and `metadata.json` into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> RenderResult<()> {
        std::fs::create_dir_all(dir)?;
        let path = basemap_path(dir);
        self.image.save(&path)?;
        self.metadata.save_to_file(&metadata_path(dir))?;
        log::info!("Basemap written to {}", path.display());
        Ok(())
    }

    /// Read a previously saved map back. The metadata is trusted as is.
    pub fn load(dir: &Path) -> RenderResult<Self> {
        let metadata = MapMetadata::load_from_file(&metadata_path(dir))?;

        let path = basemap_path(dir);
        let image = image::open(&path)
            .map_err(|e| RenderError::CorruptBasemap { path: path.clone(), message: e.to_string() })?
            .to_rgba8();

        if image.dimensions() != (metadata.width(), metadata.height()) {
            return Err(RenderError::MetadataMismatch {
                expected_width: metadata.width(),
                expected_height: metadata.height(),
                actual_width: image.width(),
                actual_height: image.height(),
            });
        }

        log::info!("Basemap loaded from {}", path.display());
        Ok(Self { image, metadata })
    }

    /// Whether `dir` holds both files written by [`MapImage::save`].
    pub fn exists(dir: &Path) -> bool {
        basemap_path(dir).is_file() && metadata_path(dir).is_file()
    }

    pub fn to_pixel(&self, world: WorldCoordinate) -> RenderResult<PixelCoordinate> {
        Ok(coords::to_pixel(world, &self.metadata)?)
    }

    pub fn to_world(&self, pixel: PixelCoordinate) -> WorldCoordinate {
        coords::to_world(pixel, &self.metadata)
    }
}

fn draw_grid(tile: &mut RgbaImage, color: Rgba<u8>) {
    for (x, y, pixel) in tile.enumerate_pixels_mut() {
        if x == 0 || y == 0 {
            *pixel = color;
        }
    }
}
