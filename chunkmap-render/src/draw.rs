//! Raster primitives: blended pixels, lines, circles, area fill and labels.
//!
//! All drawing is clipped to the image; coordinates may fall outside it.

use ab_glyph::{FontRef, PxScale};
use image::{imageops, GrayImage, Luma, Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_text_mut};

use chunkmap_core::PixelCoordinate;

use crate::error::RenderResult;

/// Face used for area labels.
const LABEL_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Height of the label strip drawn inside an area.
pub const LABEL_HEIGHT: u32 = 9;
/// Offset of the label strip from the area's top-left corner.
pub const LABEL_OFFSET: i32 = 2;

/// Composite `color` over the pixel at `(x, y)` (source-over).
pub fn blend_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return;
    }
    img.get_pixel_mut(x as u32, y as u32).blend(&color);
}

pub fn draw_line(img: &mut RgbaImage, from: PixelCoordinate, to: PixelCoordinate, color: Rgba<u8>) {
    // Bresenham line drawing
    let (mut x0, mut y0, x1, y1) = (from.x, from.y, to.x, to.y);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        blend_pixel(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

const MASK_FILL: u8 = 1;
const MASK_EDGE: u8 = 2;

/// Circle centred on `center`: `fill` inside, a one pixel `edge` ring at `radius`.
///
/// Centres off the raster draw nothing. Each pixel is blended once.
pub fn draw_circle(img: &mut RgbaImage, center: PixelCoordinate, radius: u32, edge: Rgba<u8>, fill: Rgba<u8>) {
    let (width, height) = img.dimensions();
    if center.x < 0 || center.y < 0 || center.x as u32 >= width || center.y as u32 >= height {
        return;
    }

    // past the farthest corner the ring is off the raster and the fill covers it all
    let reach = |c: i32, size: u32| c.max(size as i32 - 1 - c) as f64;
    let farthest = reach(center.x, width).hypot(reach(center.y, height));
    let radius = (radius as f64).min(farthest.ceil() + 2.0) as i32;

    let x0 = (center.x - radius).max(0);
    let y0 = (center.y - radius).max(0);
    let x1 = (center.x + radius).min(width as i32 - 1);
    let y1 = (center.y + radius).min(height as i32 - 1);

    let mut mask = GrayImage::new((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32);
    let local = (center.x - x0, center.y - y0);
    draw_filled_circle_mut(&mut mask, local, radius, Luma([MASK_FILL]));
    draw_hollow_circle_mut(&mut mask, local, radius, Luma([MASK_EDGE]));

    for (x, y, m) in mask.enumerate_pixels() {
        let color = match m[0] {
            MASK_EDGE => edge,
            MASK_FILL => fill,
            _ => continue,
        };
        img.get_pixel_mut(x0 as u32 + x, y0 as u32 + y).blend(&color);
    }
}

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub min: PixelCoordinate,
    pub max: PixelCoordinate,
}

impl PixelBounds {
    /// Smallest rectangle containing every point. `None` when `points` is empty.
    pub fn enclosing(points: &[PixelCoordinate]) -> Option<Self> {
        let first = *points.first()?;
        let (mut min, mut max) = (first, first);
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self { min, max })
    }

    pub fn width(&self) -> u32 {
        (self.max.x - self.min.x + 1) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max.y - self.min.y + 1) as u32
    }
}

/// A boundary segment in raster space: constant `fixed`, spanning `from..=to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSegment {
    pub fixed: i32,
    pub from: i32,
    pub to: i32,
}

impl PixelSegment {
    pub fn new(fixed: i32, a: i32, b: i32) -> Self {
        Self { fixed, from: a.min(b), to: a.max(b) }
    }

    fn spans(&self, v: i32) -> bool {
        self.from <= v && v <= self.to
    }
}

/// How a pixel relates to an area outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaPixel {
    Boundary,
    Interior,
    Outside,
}

/// Classify `(x, y)` against horizontal (`fixed` = y) and vertical (`fixed` = x) segments.
pub fn classify(x: i32, y: i32, horizontal: &[PixelSegment], vertical: &[PixelSegment]) -> AreaPixel {
    let on_horizontal = horizontal.iter().any(|s| s.fixed == y && s.spans(x));
    let on_vertical = vertical.iter().any(|s| s.fixed == x && s.spans(y));
    if on_horizontal || on_vertical {
        return AreaPixel::Boundary;
    }

    let above = horizontal.iter().any(|s| s.fixed < y && s.spans(x));
    let below = horizontal.iter().any(|s| s.fixed > y && s.spans(x));
    let left = vertical.iter().any(|s| s.fixed < x && s.spans(y));
    let right = vertical.iter().any(|s| s.fixed > x && s.spans(y));

    if above && below && left && right {
        AreaPixel::Interior
    } else {
        AreaPixel::Outside
    }
}

/// Paint an area outline in `line` and its interior in `fill`. Pixels outside
/// the outline keep the underlying map.
pub fn fill_area(
    img: &mut RgbaImage,
    bounds: PixelBounds,
    horizontal: &[PixelSegment],
    vertical: &[PixelSegment],
    line: Rgba<u8>,
    fill: Rgba<u8>,
) {
    for y in bounds.min.y..=bounds.max.y {
        for x in bounds.min.x..=bounds.max.x {
            match classify(x, y, horizontal, vertical) {
                AreaPixel::Boundary => blend_pixel(img, x, y, line),
                AreaPixel::Interior => blend_pixel(img, x, y, fill),
                AreaPixel::Outside => {}
            }
        }
    }
}

/// Draw `text` on a `background` strip at the top-left of `bounds`, clipped to `bounds`.
pub fn draw_label(
    img: &mut RgbaImage,
    bounds: PixelBounds,
    text: &str,
    color: Rgba<u8>,
    background: Rgba<u8>,
) -> RenderResult<()> {
    let left = bounds.min.x + LABEL_OFFSET;
    let top = bounds.min.y + LABEL_OFFSET;
    let right = bounds.max.x.min(img.width() as i32 - 1);
    let bottom = (top + LABEL_HEIGHT as i32 - 1).min(bounds.max.y).min(img.height() as i32 - 1);
    let (x0, y0) = (left.max(0), top.max(0));
    if x0 > right || y0 > bottom {
        return Ok(());
    }

    let font = FontRef::try_from_slice(LABEL_FONT)?;
    let (w, h) = ((right - x0 + 1) as u32, (bottom - y0 + 1) as u32);

    // the strip is drawn apart so glyphs never spill past it
    let mut strip = imageops::crop_imm(&*img, x0 as u32, y0 as u32, w, h).to_image();
    for p in strip.pixels_mut() {
        p.blend(&background);
    }
    draw_text_mut(&mut strip, color, left - x0, top - y0, PxScale::from(LABEL_HEIGHT as f32), &font, text);
    imageops::replace(img, &strip, x0 as i64, y0 as i64);
    Ok(())
}
