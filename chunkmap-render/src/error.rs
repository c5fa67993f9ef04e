//! Error types for compositing and editing

use std::path::PathBuf;
use thiserror::Error;

use chunkmap_core::{GeometryError, MapError};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Failed to decode tile {path}: {source}")]
    TileDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Corrupt basemap {path}: {message}")]
    CorruptBasemap { path: PathBuf, message: String },

    #[error(
        "Basemap is {actual_width}x{actual_height} but metadata expects {expected_width}x{expected_height}"
    )]
    MetadataMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Resize factor must be a positive number, got {0}")]
    InvalidResize(f64),

    #[error("Invalid image size {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Label font could not be loaded: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
