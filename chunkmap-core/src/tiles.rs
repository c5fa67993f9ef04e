//! Tile discovery: maps `{x}_{y}.png` files onto grid positions.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::coords::{check_zoom, tile_stride};
use crate::error::{MapError, MapResult};
use crate::types::GridPosition;

fn tile_name_pattern() -> MapResult<&'static Regex> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(-?[0-9]+)_(-?[0-9]+)\.png$"))
        .as_ref()
        .map_err(|e| MapError::Pattern(e.clone()))
}

/// Parse a tile file name into its chunk coordinates, e.g. `1_-4.png` -> `(1, -4)`.
pub fn parse_tile_filename(name: &str) -> MapResult<(i32, i32)> {
    let unparsable = || MapError::UnparsableFilename { name: name.to_string() };
    let caps = tile_name_pattern()?.captures(name).ok_or_else(unparsable)?;
    let x = caps[1].parse::<i32>().map_err(|_| unparsable())?;
    let y = caps[2].parse::<i32>().map_err(|_| unparsable())?;
    Ok((x, y))
}

/// Conventional file name for the tile at chunk coordinates `(x, y)`.
pub fn tile_filename(x: i32, y: i32) -> String {
    format!("{}_{}.png", x, y)
}

/// Sub-directory holding the tiles rendered at `zoom`.
pub fn zoom_dir_name(zoom: u8) -> String {
    format!("zoom-{}", zoom)
}

/// A grid slot and the file backing it, if any. A missing file renders as background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileReference {
    pub position: GridPosition,
    pub path: Option<PathBuf>,
}

impl TileReference {
    pub fn is_missing(&self) -> bool {
        self.path.is_none()
    }
}

/// Inclusive bounding rectangle of present grid positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min_column: i32,
    pub max_column: i32,
    pub min_row: i32,
    pub max_row: i32,
}

impl GridBounds {
    pub fn columns(&self) -> u32 {
        (self.max_column - self.min_column + 1) as u32
    }

    pub fn rows(&self) -> u32 {
        (self.max_row - self.min_row + 1) as u32
    }

    /// Every position in the rectangle, column-major.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        (self.min_column..=self.max_column)
            .flat_map(move |c| (self.min_row..=self.max_row).map(move |r| GridPosition::new(c, r)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TileIndex {
    zoom: u8,
    tiles: BTreeMap<GridPosition, PathBuf>,
    skipped: Vec<String>,
}

impl TileIndex {
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom,
            tiles: BTreeMap::new(),
            skipped: Vec::new(),
        }
    }

    /// Scan `dir` for tiles rendered at `zoom`.
    ///
    /// Uses `dir/zoom-<zoom>` when it exists. Files that do not follow the
    /// tile naming convention are skipped and reported through the log.
    pub fn collect(dir: &Path, zoom: u8) -> MapResult<Self> {
        check_zoom(zoom)?;
        if !dir.is_dir() {
            return Err(MapError::DirectoryNotFound { path: dir.to_path_buf() });
        }
        let zoom_dir = dir.join(zoom_dir_name(zoom));
        let root = if zoom_dir.is_dir() { zoom_dir } else { dir.to_path_buf() };
        log::info!("Collecting tiles from {}", root.display());

        let stride = tile_stride(zoom);
        let mut index = TileIndex::new(zoom);

        for entry in std::fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();

            let (x, y) = match parse_tile_filename(&name) {
                Ok(coords) => coords,
                Err(e) => {
                    log::warn!("{}", e);
                    index.skipped.push(name);
                    continue;
                }
            };

            if x.rem_euclid(stride) != 0 || y.rem_euclid(stride) != 0 {
                log::warn!("Skip {}: coordinates are not aligned to the zoom-{} stride of {}", name, zoom, stride);
                index.skipped.push(name);
                continue;
            }

            let position = GridPosition::new(x.div_euclid(stride), y.div_euclid(stride));
            if let Some(previous) = index.tiles.insert(position, entry.path()) {
                log::warn!("Tile {} is provided twice, {} replaces {}", position, name, previous.display());
            }
        }

        log::info!("Collected {} tiles ({} skipped)", index.tiles.len(), index.skipped.len());
        Ok(index)
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn insert(&mut self, position: GridPosition, path: PathBuf) {
        self.tiles.insert(position, path);
    }

    pub fn contains(&self, position: &GridPosition) -> bool {
        self.tiles.contains_key(position)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// File names rejected during [`TileIndex::collect`].
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn positions(&self) -> impl Iterator<Item = &GridPosition> {
        self.tiles.keys()
    }

    /// Reference for any grid slot; absent slots come back as missing.
    pub fn get(&self, position: GridPosition) -> TileReference {
        TileReference {
            position,
            path: self.tiles.get(&position).cloned(),
        }
    }

    pub fn present(&self) -> impl Iterator<Item = TileReference> + '_ {
        self.tiles.iter().map(|(position, path)| TileReference {
            position: *position,
            path: Some(path.clone()),
        })
    }

    pub fn bounds(&self) -> Option<GridBounds> {
        let mut positions = self.tiles.keys();
        let first = positions.next()?;
        let mut bounds = GridBounds {
            min_column: first.column,
            max_column: first.column,
            min_row: first.row,
            max_row: first.row,
        };
        for p in positions {
            bounds.min_column = bounds.min_column.min(p.column);
            bounds.max_column = bounds.max_column.max(p.column);
            bounds.min_row = bounds.min_row.min(p.row);
            bounds.max_row = bounds.max_row.max(p.row);
        }
        Some(bounds)
    }

    pub fn retain<F: FnMut(&GridPosition) -> bool>(&mut self, mut keep: F) {
        self.tiles.retain(|position, _| keep(position));
    }
}
