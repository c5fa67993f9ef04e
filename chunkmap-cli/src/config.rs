//! Configuration handling for the chunkmap CLI
//!
//! Supports loading configuration from chunkmap.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use chunkmap_core::coords::check_zoom;
use chunkmap_render::Background;

use crate::error::CliError;

pub const DEFAULT_CONFIG_FILE: &str = "chunkmap.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub edit: EditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default number of threads to use
    #[serde(default = "default_threads")]
    pub threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Edge length of the tile images in pixels
    #[serde(default = "default_tile_resolution")]
    pub tile_resolution: u32,

    /// Zoom level of the tiles to stitch (0-4)
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Fill for grid slots without a tile
    #[serde(default)]
    pub background: Background,

    /// Draw tile boundaries on the basemap
    #[serde(default)]
    pub grid: bool,

    /// Drop tiles not connected to the anchor tile
    #[serde(default)]
    pub purge_isolated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditConfig {
    /// Uniform resize factor applied last
    #[serde(default = "default_resize")]
    pub resize: f64,

    /// Prefix of the timestamped output file name
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,
}

// Default value functions
fn default_threads() -> usize { num_cpus::get() }
fn default_tile_resolution() -> u32 { 128 }
fn default_zoom() -> u8 { 4 }
fn default_resize() -> f64 { 1.0 }
fn default_output_prefix() -> String { "map".to_string() }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { threads: default_threads() }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_resolution: default_tile_resolution(),
            zoom: default_zoom(),
            background: Background::default(),
            grid: false,
            purge_isolated: false,
        }
    }
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            resize: default_resize(),
            output_prefix: default_output_prefix(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        check_zoom(config.map.zoom)
            .map_err(|e| CliError::config(e.to_string()))
            .with_context(|| format!("Invalid [map] section in {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = Self::to_toml(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;
        Ok(())
    }

    fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        Self::default().to_toml()
    }
}
