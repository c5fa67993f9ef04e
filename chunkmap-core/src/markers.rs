//! Annotation definitions loaded from the marker JSON file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::area::MIN_AREA_POINTS;
use crate::error::{GeometryError, MapResult};
use crate::types::WorldCoordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerType {
    Area,
    Line,
    Circle,
}

impl MarkerType {
    /// Fewest coordinates a marker of this type can be drawn from.
    pub fn min_coordinates(&self) -> usize {
        match self {
            MarkerType::Area => MIN_AREA_POINTS,
            MarkerType::Line => 2,
            MarkerType::Circle => 1,
        }
    }
}

/// Straight RGBA colour. Channels outside 0-255 fail to deserialise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: u8,
}

fn default_alpha() -> u8 {
    255
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn default_radius() -> u32 {
    3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    pub name: String,
    pub coordinates: Vec<WorldCoordinate>,
    /// Circle radius in pixels; ignored by the other types.
    #[serde(default = "default_radius")]
    pub radius: u32,
    pub color: Color,
    pub overlay: Color,
}

impl Marker {
    pub fn validate(&self) -> Result<(), GeometryError> {
        let required = self.marker_type.min_coordinates();
        if self.coordinates.len() < required {
            return Err(GeometryError::NotEnoughPoints {
                name: self.name.clone(),
                required,
                actual: self.coordinates.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerSet {
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn from_json_str(content: &str) -> MapResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a marker file. A file that does not exist is an empty set.
    pub fn from_json_file(path: &Path) -> MapResult<Self> {
        if !path.exists() {
            log::warn!("Marker file {} not found, no markers will be drawn", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_json_str(&content)?;
        log::info!("Loaded {} markers from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }
}
