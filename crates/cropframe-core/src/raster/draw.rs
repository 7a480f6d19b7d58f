//! Preview rendering of the crop canvas.
//!
//! Redraws sample the display bitmap with inverse mapping: for every
//! surface pixel inside the crop box, the position within the box is
//! carried back through the transform to a source position, and the
//! nearest source pixel is copied. Pixels outside the box stay black.

use crate::bitmap::Bitmap;
use crate::geometry::{CropGeometry, ViewportSize};
use crate::Transform;

/// The sub-rectangle of the source bitmap visible through the crop box,
/// in source-pixel coordinates (fractional).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Map the crop box through the bounds onto the source bitmap.
///
/// The box's position and size relative to the bounds map linearly to the
/// source image: a box covering the right half of the bounds selects the
/// right half of the source.
pub fn visible_source_rect(
    geometry: &CropGeometry,
    source_width: u32,
    source_height: u32,
) -> SourceRect {
    let crop_box = geometry.crop_box;
    let bounds = geometry.bounds;

    let bounds_width = bounds.width();
    let bounds_height = bounds.height();
    let sw = source_width as f64;
    let sh = source_height as f64;

    SourceRect {
        x: sw * ((crop_box.left - bounds.left) / bounds_width),
        y: sh * ((crop_box.top - bounds.top) / bounds_height),
        width: sw * (crop_box.width() / bounds_width),
        height: sh * (crop_box.height() / bounds_height),
    }
}

/// An RGB output surface sized from the viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Allocate a black surface matching the viewport's pixel dimensions.
    ///
    /// Called on every redraw so a resized container always gets a
    /// correctly sized surface.
    pub fn sized_to(viewport: ViewportSize) -> Self {
        let width = viewport.width.max(0.0).round() as u32;
        let height = viewport.height.max(0.0).round() as u32;
        Self {
            width,
            height,
            pixels: vec![0u8; (width as usize) * (height as usize) * 3],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB value at a pixel. Panics on out-of-range coordinates; test use.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * self.width + x) * 3) as usize;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    fn put(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = ((y * self.width + x) * 3) as usize;
        self.pixels[idx] = rgb[0];
        self.pixels[idx + 1] = rgb[1];
        self.pixels[idx + 2] = rgb[2];
    }
}

/// Draw the visible part of the bitmap into the surface, clipped to the
/// crop box and to the surface itself, with the transform's quarter-turn
/// rotation and flips applied.
pub fn draw_preview(
    surface: &mut Surface,
    bitmap: &Bitmap,
    geometry: &CropGeometry,
    transform: &Transform,
) {
    let crop_box = geometry.crop_box;
    if crop_box.is_degenerate() || bitmap.is_empty() {
        return;
    }
    let box_width = crop_box.width();
    let box_height = crop_box.height();

    let src = visible_source_rect(geometry, bitmap.width, bitmap.height);

    let x0 = crop_box.left.max(0.0).floor() as i64;
    let y0 = crop_box.top.max(0.0).floor() as i64;
    let x1 = (crop_box.right.min(surface.width as f64).ceil() as i64).max(x0);
    let y1 = (crop_box.bottom.min(surface.height as f64).ceil() as i64).max(y0);

    for y in y0..y1 {
        for x in x0..x1 {
            // Position of the pixel center within the box, 0..1
            let u = (x as f64 + 0.5 - crop_box.left) / box_width;
            let v = (y as f64 + 0.5 - crop_box.top) / box_height;
            if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                continue;
            }

            let (su, sv) = inverse_map(u, v, transform);

            let sx = (src.x + su * src.width).floor() as i64;
            let sy = (src.y + sv * src.height).floor() as i64;
            let sx = sx.clamp(0, bitmap.width as i64 - 1) as usize;
            let sy = sy.clamp(0, bitmap.height as i64 - 1) as usize;

            let idx = (sy * bitmap.width as usize + sx) * 3;
            surface.put(
                x as u32,
                y as u32,
                [
                    bitmap.pixels[idx],
                    bitmap.pixels[idx + 1],
                    bitmap.pixels[idx + 2],
                ],
            );
        }
    }
}

/// Carry a normalized output position back to a normalized source position.
///
/// The forward pipeline rotates clockwise by the quarter turns, then
/// applies the flips; the inverse undoes the flips first.
fn inverse_map(u: f64, v: f64, transform: &Transform) -> (f64, f64) {
    let u = if transform.flips_horizontal() { 1.0 - u } else { u };
    let v = if transform.flips_vertical() { 1.0 - v } else { v };

    match transform.quarter_turns() {
        1 => (v, 1.0 - u),
        2 => (1.0 - u, 1.0 - v),
        3 => (1.0 - v, u),
        _ => (u, v),
    }
}
