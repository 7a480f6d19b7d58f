//! Crop geometry state, initial layout, and the normalized-crop mapping.

use crate::geometry::{Rect, ViewportSize};
use crate::NormalizedCrop;

/// The complete geometry state of the crop canvas.
///
/// `bounds` is the screen-space extent of the displayed image, `crop_box`
/// the current selection inside it. Source dimensions are carried along so
/// the constraint solver can derive minimum sizes in screen units.
///
/// Edits produce a new value; nothing holds a partially updated state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropGeometry {
    /// The user's crop selection in screen pixels.
    pub crop_box: Rect,
    /// Full extent of the displayed image in screen pixels.
    pub bounds: Rect,
    /// Source image width in pixels.
    pub image_width: u32,
    /// Source image height in pixels.
    pub image_height: u32,
}

impl CropGeometry {
    /// Replace the crop box, keeping everything else.
    pub fn with_crop_box(self, crop_box: Rect) -> Self {
        Self { crop_box, ..self }
    }

    /// Replace the bounds, keeping everything else.
    pub fn with_bounds(self, bounds: Rect) -> Self {
        Self { bounds, ..self }
    }
}

/// Compute the initial layout when an image finishes loading.
///
/// The displayed image is scaled to fill at most `fill_fraction` of the
/// viewport on each axis (never upscaled past its native size), preserving
/// the image ratio, and centered. The crop box starts as the full bounds.
///
/// # Example
///
/// A 2000x1000 image in a 1000x800 viewport at fill 0.85 displays at
/// 850x425, centered; the box equals the bounds.
pub fn fit_image(
    image_width: u32,
    image_height: u32,
    viewport: ViewportSize,
    fill_fraction: f64,
) -> CropGeometry {
    let iw = image_width as f64;
    let ih = image_height as f64;

    let width = (fill_fraction * viewport.width).min(iw);
    let height = (fill_fraction * viewport.height).min(ih);
    let ratio = (width / iw).min(height / ih);

    let top = viewport.height / 2.0 - (ratio * ih) / 2.0;
    let left = viewport.width / 2.0 - (ratio * iw) / 2.0;
    let bounds = Rect::new(top, left, top + ratio * ih, left + ratio * iw);

    CropGeometry {
        crop_box: bounds,
        bounds,
        image_width,
        image_height,
    }
}

/// Project a screen-space crop box through its bounds into 0-1 ratios.
///
/// The bounds are the uniform screen projection of the source image, so
/// ratios relative to the bounds are ratios of the unrotated source. A box
/// equal to its bounds maps to `{0, 0, 1, 1}`.
pub fn to_normalized(crop_box: Rect, bounds: Rect) -> NormalizedCrop {
    let bounds_width = bounds.width();
    let bounds_height = bounds.height();

    NormalizedCrop {
        top_ratio: (crop_box.top - bounds.top) / bounds_height,
        left_ratio: (crop_box.left - bounds.left) / bounds_width,
        width_ratio: crop_box.width() / bounds_width,
        height_ratio: crop_box.height() / bounds_height,
    }
}

/// Inverse of [`to_normalized`]: place a normalized crop back into screen
/// space relative to the given bounds.
pub fn to_screen(crop: NormalizedCrop, bounds: Rect) -> Rect {
    let bounds_width = bounds.width();
    let bounds_height = bounds.height();

    let top = bounds.top + crop.top_ratio * bounds_height;
    let left = bounds.left + crop.left_ratio * bounds_width;

    Rect {
        top,
        left,
        bottom: top + crop.height_ratio * bounds_height,
        right: left + crop.width_ratio * bounds_width,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
