//! Edit command implementation - draw markers, crop, scale and resize a basemap

use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

use chunkmap_core::{MarkerSet, WorldCoordinate};
use chunkmap_render::{edit, EditOptions, MapImage};

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::progress::spinner;

/// Parse `x1,y1,x2,y2` into two opposite world corners.
pub fn parse_clip(value: &str) -> CliResult<[WorldCoordinate; 2]> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CliError::validation(format!("invalid clip '{}': {}", value, e)))?;

    match parts.as_slice() {
        [x1, y1, x2, y2] => Ok([WorldCoordinate::new(*x1, *y1), WorldCoordinate::new(*x2, *y2)]),
        _ => Err(CliError::validation(format!(
            "clip needs exactly 4 values, got {}. For example: 120,150,-10,10",
            parts.len()
        ))),
    }
}

/// Parse a resize factor; it must be a positive number.
pub fn parse_resize(value: &str) -> CliResult<f64> {
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => Ok(f),
        _ => Err(CliError::validation(format!("resize must be a positive number, got '{}'", value))),
    }
}

/// `<prefix>-YYYY-MM-DD-HH-mm-ss.png` inside `dir`.
pub fn timestamped_output(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(format!("{}-{}.png", prefix, Local::now().format("%Y-%m-%d-%H-%M-%S")))
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    map_dir: PathBuf,
    markers: Option<PathBuf>,
    clip: Option<[WorldCoordinate; 2]>,
    width: Option<u32>,
    height: Option<u32>,
    resize: Option<f64>,
    out: Option<PathBuf>,
    quiet: bool,
) -> Result<PathBuf> {
    if !MapImage::exists(&map_dir) {
        return Err(CliError::map_not_found(map_dir).into());
    }
    let map = MapImage::load(&map_dir).map_err(CliError::from)?;

    let markers = match markers {
        Some(path) => MarkerSet::from_json_file(&path)
            .map_err(|e| CliError::markers(e.to_string()))
            .with_context(|| format!("Failed to read markers from {}", path.display()))?,
        None => MarkerSet::default(),
    };

    let options = EditOptions {
        width,
        height,
        clip,
        resize: Some(resize.unwrap_or(config.edit.resize)),
    };

    let pb = spinner("Editing map...", quiet);
    let image = edit(&map, &markers, &options).map_err(CliError::from);
    pb.finish_and_clear();
    let image = image?;

    let path = out.unwrap_or_else(|| timestamped_output(&map_dir, &config.edit.output_prefix));
    image
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Image edit complete: {} ({}x{})", path.display(), image.width(), image.height());
    Ok(path)
}
