//! Error handling for the chunkmap CLI

use std::path::PathBuf;
use thiserror::Error;

use chunkmap_core::MapError;
use chunkmap_render::RenderError;

/// Main error type for chunkmap CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("No map found in {path}")]
    MapNotFound { path: PathBuf },

    #[error("Map data is corrupt: {message}")]
    CorruptMap { message: String },

    #[error("Tile error: {message}")]
    Tiles { message: String },

    #[error("Marker error: {message}")]
    Markers { message: String },

    #[error("Rendering error: {message}")]
    Rendering { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn map_not_found(path: PathBuf) -> Self {
        Self::MapNotFound { path }
    }

    pub fn markers<S: Into<String>>(message: S) -> Self {
        Self::Markers { message: message.into() }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }
}

impl From<MapError> for CliError {
    fn from(err: MapError) -> Self {
        match err {
            MapError::DirectoryNotFound { path } => Self::FileNotFound { path },
            MapError::MissingAnchor => Self::Tiles { message: err.to_string() },
            MapError::CorruptMetadata { .. } => Self::CorruptMap { message: err.to_string() },
            MapError::Geometry(_) | MapError::Json(_) => Self::markers(err.to_string()),
            MapError::OutOfBounds { .. } | MapError::InvalidZoom { .. } => Self::validation(err.to_string()),
            _ => Self::Rendering { message: err.to_string() },
        }
    }
}

impl From<RenderError> for CliError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Map(map_err) => map_err.into(),
            RenderError::Geometry(_) => Self::markers(err.to_string()),
            RenderError::CorruptBasemap { .. } | RenderError::MetadataMismatch { .. } => {
                Self::CorruptMap { message: err.to_string() }
            }
            RenderError::TileDecode { .. } => Self::Tiles { message: err.to_string() },
            RenderError::InvalidResize(_) | RenderError::InvalidDimensions { .. } => {
                Self::validation(err.to_string())
            }
            _ => Self::Rendering { message: err.to_string() },
        }
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the path is correct: {}\n\
                 • Ensure you have read permissions for it",
                path.display()
            ));
        }

        CliError::MapNotFound { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Run 'chunkmap build' first to generate basemap.png and metadata.json\n\
                 • Point the command at the build output directory",
            );
        }

        CliError::CorruptMap { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Rebuild the map without --cache\n\
                 • Do not edit basemap.png or metadata.json by hand",
            );
        }

        CliError::Tiles { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Make sure the tile directory contains 0_0.png for the selected zoom\n\
                 • Check that --zoom matches the zoom-<n> directory you want to stitch",
            );
        }

        CliError::Markers { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Every area corner needs a partner on the same row and column\n\
                 • Area outlines must not cross each other",
            );
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your chunkmap.toml configuration file\n\
                 • Use 'chunkmap config' to print a sample configuration",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
