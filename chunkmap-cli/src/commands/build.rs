//! Build command implementation - stitch tiles into a basemap

use anyhow::{Context, Result};
use std::path::PathBuf;

use chunkmap_render::{Background, CompositeOptions, MapImage};

use crate::config::Config;
use crate::error::CliError;
use crate::progress::spinner;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    zoom: Option<u8>,
    tile_resolution: Option<u32>,
    background: Option<Background>,
    grid: bool,
    purge_isolated: bool,
    cache: bool,
    quiet: bool,
) -> Result<MapImage> {
    if cache && MapImage::exists(&output) {
        log::info!("Using cached basemap in {}", output.display());
        return MapImage::load(&output)
            .map_err(CliError::from)
            .context("Failed to load cached basemap");
    }

    if !input.is_dir() {
        return Err(CliError::file_not_found(input).into());
    }

    let options = CompositeOptions {
        zoom: zoom.unwrap_or(config.map.zoom),
        tile_resolution: tile_resolution.unwrap_or(config.map.tile_resolution),
        background: background.unwrap_or(config.map.background),
        grid: grid || config.map.grid,
        purge_isolated: purge_isolated || config.map.purge_isolated,
    };
    log::info!("Building zoom-{} basemap from {}", options.zoom, input.display());

    let pb = spinner("Stitching tiles...", quiet);
    let map = MapImage::create(&input, &output, &options)
        .map_err(CliError::from)
        .context("Failed to build basemap");
    pb.finish_and_clear();
    let map = map?;

    log::info!(
        "Basemap generate complete: {}x{} pixels, anchor at {}",
        map.metadata.width(),
        map.metadata.height(),
        map.metadata.central_chunk_pixel
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn tiles() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        for name in ["0_0.png", "1_0.png"] {
            RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255])).save(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[test]
    fn test_build_then_cache() {
        let input = tiles();
        let out = tempdir().unwrap();
        let config = Config::default();

        let map = execute(&config, input.path().to_path_buf(), out.path().to_path_buf(), Some(0), Some(8), None, false, false, false, true).unwrap();
        assert_eq!(map.image.dimensions(), (16, 8));

        // the cached map is used even though the tiles are gone
        drop(input);
        let missing = out.path().join("no-tiles");
        let cached = execute(&config, missing, out.path().to_path_buf(), Some(0), Some(8), None, false, false, true, true).unwrap();
        assert_eq!(cached.metadata, map.metadata);
    }

    #[test]
    fn test_missing_input_suggests_paths() {
        let out = tempdir().unwrap();
        let err = execute(&Config::default(), out.path().join("nope"), out.path().to_path_buf(), None, None, None, false, false, false, true).unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::FileNotFound { .. })));
    }
}
