//! Info command implementation - describe a built map

use anyhow::Result;
use std::path::PathBuf;

use chunkmap_core::coords::{pixels_per_world_unit, to_world};
use chunkmap_core::metadata::metadata_path;
use chunkmap_core::{MapMetadata, PixelCoordinate};

use crate::error::CliError;

pub fn execute(map_dir: PathBuf) -> Result<()> {
    let path = metadata_path(&map_dir);
    if !path.is_file() {
        return Err(CliError::map_not_found(map_dir).into());
    }
    let meta = MapMetadata::load_from_file(&path).map_err(CliError::from)?;

    for line in describe(&meta) {
        println!("{}", line);
    }
    Ok(())
}

fn describe(meta: &MapMetadata) -> Vec<String> {
    let top_left = to_world(PixelCoordinate::new(0, 0), meta);
    let bottom_right = to_world(
        PixelCoordinate::new(meta.width() as i32 - 1, meta.height() as i32 - 1),
        meta,
    );
    vec![
        format!("Resolution:      {}x{}", meta.width(), meta.height()),
        format!("Tiles:           {}x{} of {}px", meta.image_count[0], meta.image_count[1], meta.chunk_image_resolution),
        format!("Zoom:            {}", meta.zoom),
        format!("Anchor pixel:    {}", meta.central_chunk_pixel),
        format!("Pixels per unit: {}", pixels_per_world_unit(meta.zoom, meta.chunk_image_resolution)),
        format!("World extent:    {} to {}", top_left, bottom_right),
    ]
}
