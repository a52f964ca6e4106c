//! Overlay rendering: draws highlight boxes onto raster images.

mod color;

pub use color::Color;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, Blend};
use imageproc::rect::Rect;
use linch_ocr::BBox;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("invalid display size: {0}x{1}")]
    InvalidSize(f32, f32),
}

/// Fill and border of a highlight box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fill: Color::rgba(255, 255, 0, 0x66),
            stroke: Color::rgba(255, 0, 0, 255),
            stroke_width: 2,
        }
    }
}

/// Pixel rectangle of `bbox` clipped to a `width`x`height` canvas.
fn clip_rect(bbox: &BBox, width: u32, height: u32) -> Option<Rect> {
    if bbox.is_degenerate() {
        return None;
    }
    let x0 = bbox.x0.floor().max(0.0) as i64;
    let y0 = bbox.y0.floor().max(0.0) as i64;
    let x1 = (bbox.x1.ceil() as i64).min(width as i64);
    let y1 = (bbox.y1.ceil() as i64).min(height as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32))
}

/// Draws filled, bordered rectangles with alpha blending.
///
/// Returns the number of boxes that landed on the canvas.
pub fn draw_highlights(img: &mut RgbaImage, boxes: &[BBox], style: &OverlayStyle) -> usize {
    let (width, height) = img.dimensions();
    let mut canvas = Blend(std::mem::replace(img, RgbaImage::new(0, 0)));
    let mut drawn = 0;

    for bbox in boxes {
        let Some(rect) = clip_rect(bbox, width, height) else {
            log::debug!("[Render] box outside canvas, skipped: {:?}", bbox);
            continue;
        };

        draw_filled_rect_mut(&mut canvas, rect, style.fill.into());

        // Border grows inward, one hollow rect per pixel of width.
        for inset in 0..style.stroke_width {
            let w = rect.width() as i64 - 2 * inset as i64;
            let h = rect.height() as i64 - 2 * inset as i64;
            if w <= 0 || h <= 0 {
                break;
            }
            let ring = Rect::at(rect.left() + inset as i32, rect.top() + inset as i32)
                .of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut canvas, ring, style.stroke.into());
        }

        drawn += 1;
    }

    *img = canvas.0;
    drawn
}

/// Resizes the image to its displayed size.
pub fn resize_to_display(
    img: &DynamicImage,
    display_width: f32,
    display_height: f32,
) -> Result<RgbaImage, RenderError> {
    if !(display_width.is_finite() && display_height.is_finite())
        || display_width <= 0.0
        || display_height <= 0.0
    {
        return Err(RenderError::InvalidSize(display_width, display_height));
    }

    // Sub-pixel display sizes still get a one-pixel canvas.
    let w = (display_width.round() as u32).max(1);
    let h = (display_height.round() as u32).max(1);
    let rgba = img.to_rgba8();
    if rgba.dimensions() == (w, h) {
        return Ok(rgba);
    }

    log::info!(
        "[Render] resize {}x{} -> {}x{}",
        rgba.width(),
        rgba.height(),
        w,
        h
    );
    Ok(image::imageops::resize(&rgba, w, h, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn white(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_draws_fill_and_border() {
        let mut img = white(20, 20);
        let style = OverlayStyle {
            fill: Color::rgba(0, 0, 255, 255),
            stroke: Color::rgba(255, 0, 0, 255),
            stroke_width: 1,
        };
        let drawn = draw_highlights(&mut img, &[BBox::new(5.0, 5.0, 15.0, 15.0)], &style);

        assert_eq!(drawn, 1);
        assert_eq!(*img.get_pixel(5, 5), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(14, 10), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(10, 10), Rgba([0, 0, 255, 255]));
        assert_eq!(*img.get_pixel(2, 2), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(15, 15), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_wide_border_is_nested() {
        let mut img = white(20, 20);
        let style = OverlayStyle {
            fill: Color::rgba(0, 0, 255, 255),
            stroke: Color::rgba(255, 0, 0, 255),
            stroke_width: 2,
        };
        draw_highlights(&mut img, &[BBox::new(5.0, 5.0, 15.0, 15.0)], &style);

        let red = Rgba([255, 0, 0, 255]);
        let blue = Rgba([0, 0, 255, 255]);
        assert_eq!(*img.get_pixel(5, 10), red);
        assert_eq!(*img.get_pixel(6, 10), red);
        assert_eq!(*img.get_pixel(13, 10), red);
        assert_eq!(*img.get_pixel(10, 6), red);
        assert_eq!(*img.get_pixel(7, 10), blue);
        assert_eq!(*img.get_pixel(12, 12), blue);
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut img = white(10, 10);
        let style = OverlayStyle {
            stroke_width: 0,
            ..OverlayStyle::default()
        };
        draw_highlights(&mut img, &[BBox::new(0.0, 0.0, 10.0, 10.0)], &style);

        let px = img.get_pixel(5, 5);
        // translucent yellow over white keeps red/green, darkens blue
        assert!(px[0] >= 254);
        assert!(px[1] >= 254);
        assert!(px[2] < 255 && px[2] > 0);
    }

    #[test]
    fn test_clips_and_skips() {
        let mut img = white(10, 10);
        let boxes = [
            BBox::new(-5.0, -5.0, 3.0, 3.0),
            BBox::new(20.0, 20.0, 30.0, 30.0),
            BBox::new(4.0, 4.0, 4.0, 8.0),
        ];
        let drawn = draw_highlights(&mut img, &boxes, &OverlayStyle::default());
        assert_eq!(drawn, 1);
        assert_eq!(img.dimensions(), (10, 10));
    }

    #[test]
    fn test_resize_to_display() {
        let img = DynamicImage::new_rgb8(200, 100);
        let resized = resize_to_display(&img, 100.0, 50.0).unwrap();
        assert_eq!(resized.dimensions(), (100, 50));

        let same = resize_to_display(&img, 200.0, 100.0).unwrap();
        assert_eq!(same.dimensions(), (200, 100));

        let tiny = resize_to_display(&img, 0.5, 0.25).unwrap();
        assert_eq!(tiny.dimensions(), (1, 1));

        assert!(resize_to_display(&img, 0.0, 50.0).is_err());
        assert!(resize_to_display(&img, 10.0, -1.0).is_err());
        assert!(resize_to_display(&img, f32::INFINITY, 10.0).is_err());
    }

    #[test]
    fn test_style_from_json() {
        let style: OverlayStyle =
            serde_json::from_str(r##"{"fill": "#00ff0080", "strokeWidth": 3}"##).unwrap();
        assert_eq!(style.fill, Color::rgba(0, 255, 0, 0x80));
        assert_eq!(style.stroke, OverlayStyle::default().stroke);
        assert_eq!(style.stroke_width, 3);
    }
}
