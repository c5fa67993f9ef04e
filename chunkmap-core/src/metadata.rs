//! Persisted description of a stitched basemap.
//!
//! The metadata is written once by `create` and trusted verbatim by `load`;
//! geometry is never re-derived from the tiles afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::coords::check_zoom;
use crate::error::{MapError, MapResult};
use crate::types::PixelCoordinate;

pub const BASEMAP_FILE: &str = "basemap.png";
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMetadata {
    /// Full raster size in pixels, `[width, height]`.
    pub full_resolution: [u32; 2],
    /// Edge length of one square tile image in pixels.
    pub chunk_image_resolution: u32,
    /// Number of tiles per axis, `[width, height]`.
    pub image_count: [u32; 2],
    pub zoom: u8,
    /// Top-left pixel of the anchor tile.
    pub central_chunk_pixel: PixelCoordinate,
}

impl MapMetadata {
    pub fn width(&self) -> u32 {
        self.full_resolution[0]
    }

    pub fn height(&self) -> u32 {
        self.full_resolution[1]
    }

    pub fn load_from_file(path: &Path) -> MapResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MapError::CorruptMetadata {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let metadata: Self = serde_json::from_str(&content).map_err(|e| MapError::CorruptMetadata {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        check_zoom(metadata.zoom).map_err(|e| MapError::CorruptMetadata {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(metadata)
    }

    pub fn save_to_file(&self, path: &Path) -> MapResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

pub fn basemap_path(map_dir: &Path) -> PathBuf {
    map_dir.join(BASEMAP_FILE)
}

pub fn metadata_path(map_dir: &Path) -> PathBuf {
    map_dir.join(METADATA_FILE)
}
