//! Rendering of raster highlights
//!
//! Draws highlight rectangles as outlines on an RGB image and encodes the
//! result for transport.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::error::Result;
use crate::geometry::Rect;

/// Outline color for highlighted words
pub const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Outline thickness in pixels
pub const OUTLINE_WIDTH: u32 = 2;

/// Decode an encoded image (any enabled format) into RGB
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

/// Outline every rectangle in place; parts outside the image are clipped
pub fn draw_highlights(image: &mut RgbImage, rects: &[Rect]) {
    for rect in rects {
        draw_outline(image, rect, OUTLINE_COLOR, OUTLINE_WIDTH);
    }
    debug!(rects = rects.len(), "drew highlight outlines");
}

/// Outline one rectangle with the given color and thickness
pub fn draw_outline(image: &mut RgbImage, rect: &Rect, color: Rgb<u8>, thickness: u32) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    // edges come from the whole rectangle; only painting is clipped
    let left = rect.x1.min(rect.x2).floor() as i64;
    let right = rect.x1.max(rect.x2).ceil() as i64;
    let top = rect.y1.min(rect.y2).floor() as i64;
    let bottom = rect.y1.max(rect.y2).ceil() as i64;

    if right < 0 || bottom < 0 || left >= i64::from(width) || top >= i64::from(height) {
        return;
    }

    let t = i64::from(thickness.max(1));
    let x_range = left.max(0)..=right.min(i64::from(width) - 1);
    let y_range = top.max(0)..=bottom.min(i64::from(height) - 1);

    for y in y_range {
        for x in x_range.clone() {
            if x < left + t || x > right - t || y < top + t || y > bottom - t {
                image.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Encode an image as PNG
pub fn to_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Encode an image as a `data:image/png;base64,` URL
pub fn to_data_url(image: &RgbImage) -> Result<String> {
    let png = to_png(image)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    Ok(format!("data:image/png;base64,{}", encoded))
}
