//! Error types shared by the chunkmap crates

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{Orientation, WorldCoordinate};

/// Malformed annotation geometry. Always fatal for the marker being drawn.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("{name} has an odd number of points at {axis}={value}")]
    OddVertexCount {
        name: String,
        axis: Orientation,
        value: i32,
    },

    #[error("Intersecting lines were detected in {name}: {h_start} to {h_end} and {v_start} to {v_end}")]
    IntersectingLines {
        name: String,
        h_start: WorldCoordinate,
        h_end: WorldCoordinate,
        v_start: WorldCoordinate,
        v_end: WorldCoordinate,
    },

    #[error("{name} has an open outline at {at}")]
    OpenOutline { name: String, at: WorldCoordinate },

    #[error("{name} needs at least {required} coordinates, got {actual}")]
    NotEnoughPoints {
        name: String,
        required: usize,
        actual: usize,
    },
}

/// Errors raised by tile indexing, coordinate math and metadata persistence.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Tile directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Skip illegal file name: {name}")]
    UnparsableFilename { name: String },

    #[error("The center of the map (0,0) could not be found")]
    MissingAnchor,

    #[error("x={x:.2}, y={y:.2} is out of the map ({width}*{height})")]
    OutOfBounds {
        x: f64,
        y: f64,
        width: u32,
        height: u32,
    },

    #[error("Zoom level {zoom} is out of range (0-4)")]
    InvalidZoom { zoom: u8 },

    #[error("Corrupt metadata in {path}: {message}")]
    CorruptMetadata { path: PathBuf, message: String },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Invalid tile name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type MapResult<T> = Result<T, MapError>;
