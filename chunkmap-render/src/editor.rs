//! Post-processing of a basemap: markers, crop, scale, resize.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use chunkmap_core::{MarkerSet, WorldCoordinate};

use crate::compositor::MapImage;
use crate::error::{RenderError, RenderResult};
use crate::markers::draw_marker;

/// Edit parameters. Every step whose parameter is `None` is skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditOptions {
    /// Target width in pixels. Alone it scales the height proportionally.
    pub width: Option<u32>,
    /// Target height in pixels. Alone it scales the width proportionally.
    pub height: Option<u32>,
    /// Two opposite world-space corners to crop to, in any order.
    pub clip: Option<[WorldCoordinate; 2]>,
    /// Uniform factor applied last; must be positive.
    pub resize: Option<f64>,
}

/// Render `markers` onto a copy of the basemap, then crop, scale and resize it.
pub fn edit(map: &MapImage, markers: &MarkerSet, options: &EditOptions) -> RenderResult<RgbaImage> {
    let mut image = map.image.clone();

    for marker in markers.iter() {
        draw_marker(&mut image, marker, &map.metadata)?;
    }
    log::info!("Drew {} markers", markers.len());

    if let Some(clip) = options.clip {
        image = crop(map, &image, clip)?;
    }

    image = scale(image, options.width, options.height)?;

    if let Some(factor) = options.resize {
        image = resize(image, factor)?;
    }

    Ok(image)
}

fn crop(map: &MapImage, image: &RgbaImage, clip: [WorldCoordinate; 2]) -> RenderResult<RgbaImage> {
    let a = map.to_pixel(clip[0])?;
    let b = map.to_pixel(clip[1])?;
    let (x0, x1) = (a.x.min(b.x) as u32, a.x.max(b.x) as u32);
    let (y0, y1) = (a.y.min(b.y) as u32, a.y.max(b.y) as u32);

    let (width, height) = (x1 - x0, y1 - y0);
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }

    log::info!("Cropping to {}x{} at ({}, {})", width, height, x0, y0);
    Ok(imageops::crop_imm(image, x0, y0, width, height).to_image())
}

fn scale(image: RgbaImage, width: Option<u32>, height: Option<u32>) -> RenderResult<RgbaImage> {
    let (w, h) = image.dimensions();
    let proportional = |target: u32, from: u32, other: u32| ((other as f64 * target as f64 / from as f64).round() as u32).max(1);

    let (new_w, new_h) = match (width, height) {
        (None, None) => return Ok(image),
        (Some(nw), None) => (nw, proportional(nw, w, h)),
        (None, Some(nh)) => (proportional(nh, h, w), nh),
        (Some(nw), Some(nh)) => (nw, nh),
    };
    if new_w == 0 || new_h == 0 {
        return Err(RenderError::InvalidDimensions { width: new_w, height: new_h });
    }

    log::info!("Scaling {}x{} to {}x{}", w, h, new_w, new_h);
    Ok(imageops::resize(&image, new_w, new_h, FilterType::Triangle))
}

fn resize(image: RgbaImage, factor: f64) -> RenderResult<RgbaImage> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(RenderError::InvalidResize(factor));
    }
    if factor == 1.0 {
        return Ok(image);
    }

    let (w, h) = image.dimensions();
    let new_w = (w as f64 * factor).round() as u32;
    let new_h = (h as f64 * factor).round() as u32;
    if new_w == 0 || new_h == 0 {
        return Err(RenderError::InvalidDimensions { width: new_w, height: new_h });
    }

    log::info!("Resizing by {} to {}x{}", factor, new_w, new_h);
    Ok(imageops::resize(&image, new_w, new_h, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]))
    }

    #[test]
    fn test_scale_width_only_keeps_aspect() {
        let out = scale(blank(200, 100), Some(50), None).unwrap();
        assert_eq!(out.dimensions(), (50, 25));
    }

    #[test]
    fn test_scale_height_only_keeps_aspect() {
        let out = scale(blank(200, 100), None, Some(30)).unwrap();
        assert_eq!(out.dimensions(), (60, 30));
    }

    #[test]
    fn test_scale_both_is_anisotropic() {
        let out = scale(blank(200, 100), Some(40), Some(70)).unwrap();
        assert_eq!(out.dimensions(), (40, 70));
    }

    #[test]
    fn test_scale_none_is_noop() {
        assert_eq!(scale(blank(7, 3), None, None).unwrap().dimensions(), (7, 3));
    }

    #[test]
    fn test_zero_target_is_rejected() {
        assert!(matches!(
            scale(blank(10, 10), Some(0), None),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_resize_rounds() {
        assert_eq!(resize(blank(101, 33), 0.5).unwrap().dimensions(), (51, 17));
        assert_eq!(resize(blank(10, 10), 1.0).unwrap().dimensions(), (10, 10));
    }

    #[test]
    fn test_resize_factor_must_be_positive() {
        assert!(matches!(resize(blank(4, 4), 0.0), Err(RenderError::InvalidResize(_))));
        assert!(matches!(resize(blank(4, 4), -2.0), Err(RenderError::InvalidResize(_))));
        assert!(matches!(resize(blank(4, 4), f64::NAN), Err(RenderError::InvalidResize(_))));
    }
}
