//! Fetching tiles from a remote store into the on-disk tile layout.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::MapResult;
use crate::tiles::{tile_filename, zoom_dir_name};

/// One stored tile image, keyed by chunk coordinates and zoom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRow {
    pub x: i32,
    pub y: i32,
    pub zoom: u8,
    /// Encoded PNG bytes, written out untouched.
    pub image: Vec<u8>,
}

impl TileRow {
    /// Where this row lands under `output`: `zoom-<z>/{x}_{y}.png`.
    pub fn path_under(&self, output: &Path) -> PathBuf {
        output.join(zoom_dir_name(self.zoom)).join(tile_filename(self.x, self.y))
    }
}

/// A passive, row-oriented source of tile images.
pub trait TileSource {
    fn tiles(&self, map_id: u32) -> MapResult<Vec<TileRow>>;
}

/// Write every tile of `map_id` below `output`, returning how many were written.
pub fn download_all<S: TileSource + ?Sized>(source: &S, map_id: u32, output: &Path) -> MapResult<usize> {
    let rows = source.tiles(map_id)?;
    log::info!("Downloading {} tiles of map {} into {}", rows.len(), map_id, output.display());

    for row in &rows {
        let path = row.path_under(output);
        log::debug!("Downloading: zoom={}, x={}, y={}", row.zoom, row.x, row.y);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &row.image)?;
    }

    Ok(rows.len())
}

/// Tile rows held in memory, grouped by map identifier.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTileSource {
    maps: BTreeMap<u32, Vec<TileRow>>,
}

impl InMemoryTileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, map_id: u32, row: TileRow) {
        self.maps.entry(map_id).or_default().push(row);
    }
}

impl TileSource for InMemoryTileSource {
    fn tiles(&self, map_id: u32) -> MapResult<Vec<TileRow>> {
        Ok(self.maps.get(&map_id).cloned().unwrap_or_default())
    }
}
