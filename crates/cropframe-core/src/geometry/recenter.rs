//! Recentering: where the canvas converges after a committed gesture.

use crate::geometry::{CropGeometry, Rect, RectDeltas, ViewportSize};

/// Per-edge deltas (target minus current) for the crop box and bounds.
///
/// The settle animation consumes deltas rather than absolute targets so it
/// can apply them incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecenterDeltas {
    pub crop_box: RectDeltas,
    pub bounds: RectDeltas,
}

impl RecenterDeltas {
    /// Scale both delta sets by `1 / divisor`.
    pub fn divided(self, divisor: f64) -> Self {
        Self {
            crop_box: self.crop_box.divided(divisor),
            bounds: self.bounds.divided(divisor),
        }
    }

    /// Apply both delta sets to a geometry, producing the moved geometry.
    pub fn applied_to(self, geometry: CropGeometry) -> CropGeometry {
        CropGeometry {
            crop_box: self.crop_box.applied_to(geometry.crop_box),
            bounds: self.bounds.applied_to(geometry.bounds),
            ..geometry
        }
    }
}

/// Compute the deltas that recenter and rescale the view around the box.
///
/// A uniform scale ratio is chosen so the box fills `fill_fraction` of the
/// viewport on its more constraining axis. Both box and bounds are scaled
/// about the bounds' top-left corner, then translated together so the box
/// lands centered in the viewport.
pub fn recenter_deltas(
    geometry: &CropGeometry,
    viewport: ViewportSize,
    fill_fraction: f64,
) -> RecenterDeltas {
    let crop_box = geometry.crop_box;
    let bounds = geometry.bounds;

    let box_width = crop_box.width();
    let box_height = crop_box.height();

    let ratio = (fill_fraction * viewport.width / box_width)
        .min(fill_fraction * viewport.height / box_height);

    // 1. scale about the bounds' top-left
    let scaled_bounds = Rect::new(
        bounds.top,
        bounds.left,
        bounds.top + bounds.height() * ratio,
        bounds.left + bounds.width() * ratio,
    );

    let box_top = bounds.top + (crop_box.top - bounds.top) * ratio;
    let box_left = bounds.left + (crop_box.left - bounds.left) * ratio;
    let scaled_box = Rect::new(
        box_top,
        box_left,
        box_top + box_height * ratio,
        box_left + box_width * ratio,
    );

    // 2. translate so the scaled box is centered in the viewport
    let delta_x = (viewport.width / 2.0 - (ratio * box_width) / 2.0) - box_left;
    let delta_y = (viewport.height / 2.0 - (ratio * box_height) / 2.0) - box_top;

    RecenterDeltas {
        crop_box: RectDeltas::between(crop_box, scaled_box.translated(delta_x, delta_y)),
        bounds: RectDeltas::between(bounds, scaled_bounds.translated(delta_x, delta_y)),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
