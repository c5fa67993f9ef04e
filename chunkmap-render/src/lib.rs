//! Chunkmap Render Library
//!
//! Stitches tile images into a basemap, draws annotations on it and
//! post-processes the result (crop, scale, resize).

pub mod error;
pub mod draw;
pub mod compositor;
pub mod markers;
pub mod editor;

pub use error::{RenderError, RenderResult};
pub use compositor::{Background, CompositeOptions, MapImage};
pub use editor::{edit, EditOptions};
pub use markers::draw_marker;
