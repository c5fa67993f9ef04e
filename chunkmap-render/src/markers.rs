//! Drawing annotation markers onto a basemap.

use image::{Rgba, RgbaImage};

use chunkmap_core::area::{self, BoundarySegment};
use chunkmap_core::coords::to_pixel;
use chunkmap_core::{Color, MapMetadata, MapResult, Marker, MarkerType, PixelCoordinate};

use crate::draw::{self, PixelBounds, PixelSegment};
use crate::error::RenderResult;

fn rgba(color: Color) -> Rgba<u8> {
    Rgba(color.to_array())
}

/// Draw one marker. Every coordinate must land inside the raster.
pub fn draw_marker(img: &mut RgbaImage, marker: &Marker, metadata: &MapMetadata) -> RenderResult<()> {
    marker.validate()?;
    let pixels = marker
        .coordinates
        .iter()
        .map(|c| to_pixel(*c, metadata))
        .collect::<MapResult<Vec<_>>>()?;

    log::debug!("Drawing {:?} marker '{}' with {} points", marker.marker_type, marker.name, pixels.len());

    match marker.marker_type {
        MarkerType::Line => {
            for pair in pixels.windows(2) {
                draw::draw_line(img, pair[0], pair[1], rgba(marker.color));
            }
        }
        MarkerType::Circle => {
            draw::draw_circle(img, pixels[0], marker.radius, rgba(marker.color), rgba(marker.overlay));
        }
        MarkerType::Area => draw_area(img, marker, &pixels, metadata)?,
    }
    Ok(())
}

fn draw_area(
    img: &mut RgbaImage,
    marker: &Marker,
    pixels: &[PixelCoordinate],
    metadata: &MapMetadata,
) -> RenderResult<()> {
    let outline = area::optimize(&marker.name, &marker.coordinates)?;

    let to_pixel_segment = |s: &BoundarySegment, horizontal: bool| -> MapResult<PixelSegment> {
        let start = to_pixel(s.start, metadata)?;
        let end = to_pixel(s.end, metadata)?;
        Ok(if horizontal {
            PixelSegment::new(start.y, start.x, end.x)
        } else {
            PixelSegment::new(start.x, start.y, end.y)
        })
    };
    let horizontal = outline
        .horizontal
        .iter()
        .map(|s| to_pixel_segment(s, true))
        .collect::<MapResult<Vec<_>>>()?;
    let vertical = outline
        .vertical
        .iter()
        .map(|s| to_pixel_segment(s, false))
        .collect::<MapResult<Vec<_>>>()?;

    let Some(bounds) = PixelBounds::enclosing(pixels) else {
        return Ok(());
    };
    draw::fill_area(img, bounds, &horizontal, &vertical, rgba(marker.color), rgba(marker.overlay));
    draw::draw_label(img, bounds, &marker.name, rgba(marker.color), rgba(marker.overlay))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use chunkmap_core::{GeometryError, MapError, WorldCoordinate};

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    /// 64x64 raster, one pixel per world unit, world (0, -64) at pixel (0, 0).
    fn metadata() -> MapMetadata {
        MapMetadata {
            full_resolution: [64, 64],
            chunk_image_resolution: 64,
            image_count: [1, 1],
            zoom: 0,
            central_chunk_pixel: PixelCoordinate::new(0, 0),
        }
    }

    fn marker(marker_type: MarkerType, coords: &[(i32, i32)]) -> Marker {
        Marker {
            marker_type,
            name: "m".to_string(),
            coordinates: coords.iter().map(|&(x, y)| WorldCoordinate::new(x, y - 64)).collect(),
            radius: 3,
            color: Color::rgb(255, 0, 0),
            overlay: Color::rgb(0, 255, 0),
        }
    }

    #[test]
    fn test_line_marker() {
        let mut img = RgbaImage::from_pixel(64, 64, BLACK);
        draw_marker(&mut img, &marker(MarkerType::Line, &[(5, 10), (20, 10)]), &metadata()).unwrap();
        assert_eq!(*img.get_pixel(5, 10), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(20, 10), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(21, 10), BLACK);
    }

    #[test]
    fn test_circle_marker_is_centred() {
        let mut img = RgbaImage::from_pixel(64, 64, BLACK);
        draw_marker(&mut img, &marker(MarkerType::Circle, &[(30, 30)]), &metadata()).unwrap();
        assert_eq!(*img.get_pixel(30, 30), Rgba([0, 255, 0, 255]));
        assert_eq!(*img.get_pixel(33, 30), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(27, 30), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_circle_with_huge_radius_covers_the_map() {
        let mut img = RgbaImage::from_pixel(64, 64, BLACK);
        let mut m = marker(MarkerType::Circle, &[(30, 30)]);
        m.radius = 50_000;
        draw_marker(&mut img, &m, &metadata()).unwrap();
        assert!(img.pixels().all(|p| *p == Rgba([0, 255, 0, 255])));
    }

    #[test]
    fn test_area_marker() {
        let mut img = RgbaImage::from_pixel(64, 64, BLACK);
        let m = marker(MarkerType::Area, &[(10, 10), (50, 10), (50, 50), (10, 50)]);
        draw_marker(&mut img, &m, &metadata()).unwrap();

        assert_eq!(*img.get_pixel(10, 30), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(50, 50), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(30, 40), Rgba([0, 255, 0, 255]));
        assert_eq!(*img.get_pixel(5, 5), BLACK);
        assert_eq!(*img.get_pixel(55, 30), BLACK);
    }

    #[test]
    fn test_out_of_map_marker_fails() {
        let mut img = RgbaImage::from_pixel(64, 64, BLACK);
        let err = draw_marker(&mut img, &marker(MarkerType::Line, &[(5, 10), (500, 10)]), &metadata()).unwrap_err();
        assert!(matches!(err, RenderError::Map(MapError::OutOfBounds { .. })));
    }

    #[test]
    fn test_short_marker_fails() {
        let mut img = RgbaImage::from_pixel(64, 64, BLACK);
        let err = draw_marker(&mut img, &marker(MarkerType::Line, &[(5, 10)]), &metadata()).unwrap_err();
        assert!(matches!(err, RenderError::Geometry(GeometryError::NotEnoughPoints { .. })));
    }
}
