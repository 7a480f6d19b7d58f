//! Constraint solver for crop-box edits.
//!
//! Drag gestures propose new positions for one or two box edges. The solver
//! merges the proposal into a hypothetical box, clamps it to the minimum
//! size, fits it to the active aspect-ratio policy, and re-anchors the
//! undragged edges so the opposite corner stays pinned.
//!
//! Border drags are different: they slide the bounds underneath a fixed
//! box, clamped so the bounds keep enclosing it.

use crate::geometry::{CropGeometry, Rect};
use crate::{AspectRatio, Transform};

/// A partial update to the crop box, carrying only the dragged edges.
///
/// Corner handles propose one vertical and one horizontal edge; an edge
/// handle proposes a single one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProposedEdges {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub bottom: Option<f64>,
    pub right: Option<f64>,
}

impl ProposedEdges {
    pub fn top_left(x: f64, y: f64) -> Self {
        Self {
            top: Some(y),
            left: Some(x),
            ..Self::default()
        }
    }

    pub fn top_right(x: f64, y: f64) -> Self {
        Self {
            top: Some(y),
            right: Some(x),
            ..Self::default()
        }
    }

    pub fn bottom_right(x: f64, y: f64) -> Self {
        Self {
            bottom: Some(y),
            right: Some(x),
            ..Self::default()
        }
    }

    pub fn bottom_left(x: f64, y: f64) -> Self {
        Self {
            bottom: Some(y),
            left: Some(x),
            ..Self::default()
        }
    }
}

/// Minimum crop-box dimension in screen pixels.
///
/// The floor is the largest of one screen pixel, one source pixel in screen
/// units, and one hundredth of the source's smaller dimension in screen
/// units, so the box can never degenerate even on tiny or huge images.
pub fn min_box_size(geometry: &CropGeometry) -> f64 {
    let one_px = geometry.bounds.width() / geometry.image_width as f64;
    let one_hundredth =
        (geometry.image_width.min(geometry.image_height) as f64 / 100.0) * one_px;

    1.0f64.max(one_px).max(one_hundredth)
}

/// Solve a proposed edge edit against the current geometry.
///
/// Steps:
/// 1. merge the proposed edges into a hypothetical box;
/// 2. clamp its width/height to [`min_box_size`] (degenerate and inverted
///    boxes are clamped here, before any division);
/// 3. resolve the aspect targets for the active policy, swapping fixed
///    ratios when the transform rotates by an odd quarter turn;
/// 4. take the single ratio `min(width / aspect_w, height / aspect_h)` and
///    derive the final size from it, so the more constraining dragged
///    dimension wins and the result matches the target ratio exactly;
/// 5. re-anchor each axis from its undragged edge, pinning the opposite
///    corner;
/// 6. reset the bounds to `initial_bounds`, the bounds captured at drag
///    start (a preceding border drag may have moved them; resizing must
///    not).
///
/// Returns the replacement geometry value.
pub fn solve_edges(
    proposed: ProposedEdges,
    geometry: &CropGeometry,
    aspect: AspectRatio,
    transform: &Transform,
    initial_bounds: Rect,
) -> CropGeometry {
    let mut hypothetical = geometry.crop_box;
    if let Some(top) = proposed.top {
        hypothetical.top = top;
    }
    if let Some(left) = proposed.left {
        hypothetical.left = left;
    }
    if let Some(bottom) = proposed.bottom {
        hypothetical.bottom = bottom;
    }
    if let Some(right) = proposed.right {
        hypothetical.right = right;
    }

    let floor = min_box_size(geometry);
    let new_width = hypothetical.width().max(floor);
    let new_height = hypothetical.height().max(floor);

    let (aspect_width, aspect_height) = aspect.target_dims(
        (new_width, new_height),
        (geometry.bounds.width(), geometry.bounds.height()),
        transform.swaps_axes(),
    );

    let ratio = (new_width / aspect_width).min(new_height / aspect_height);
    let final_width = aspect_width * ratio;
    let final_height = aspect_height * ratio;

    let mut solved = hypothetical;
    if proposed.top.is_some() {
        solved.top = hypothetical.bottom - final_height;
    } else if proposed.bottom.is_some() {
        solved.bottom = hypothetical.top + final_height;
    } else {
        solved.bottom = hypothetical.top + final_height;
    }

    if proposed.left.is_some() {
        solved.left = hypothetical.right - final_width;
    } else if proposed.right.is_some() {
        solved.right = hypothetical.left + final_width;
    } else {
        solved.right = hypothetical.left + final_width;
    }

    geometry.with_crop_box(solved).with_bounds(initial_bounds)
}

/// Slide the bounds underneath a fixed crop box during a border drag.
///
/// The drag-start bounds are translated by the cumulative pointer delta,
/// then clamped edge by edge so the bounds keep enclosing the box. The box
/// itself does not move.
pub fn slide_bounds(crop_box: Rect, initial_bounds: Rect, dx: f64, dy: f64) -> Rect {
    let bounds_height = initial_bounds.height();
    let bounds_width = initial_bounds.width();

    let mut top = crop_box.top.min(initial_bounds.top + dy);
    if top + bounds_height <= crop_box.bottom {
        top = crop_box.bottom - bounds_height;
    }

    let mut left = crop_box.left.min(initial_bounds.left + dx);
    if left + bounds_width <= crop_box.right {
        left = crop_box.right - bounds_width;
    }

    Rect::new(top, left, top + bounds_height, left + bounds_width)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn aspect_strategy() -> impl Strategy<Value = AspectRatio> {
        prop_oneof![
            Just(AspectRatio::Free),
            Just(AspectRatio::Original),
            Just(AspectRatio::Square),
            Just(AspectRatio::Ratio16x9),
            Just(AspectRatio::Ratio4x3),
            Just(AspectRatio::Ratio3x2),
        ]
    }

    fn corner_strategy() -> impl Strategy<Value = ProposedEdges> {
        (0u8..4, -200.0f64..=900.0, -200.0f64..=900.0).prop_map(|(corner, x, y)| match corner {
            0 => ProposedEdges::top_left(x, y),
            1 => ProposedEdges::top_right(x, y),
            2 => ProposedEdges::bottom_right(x, y),
            _ => ProposedEdges::bottom_left(x, y),
        })
    }

    fn test_geometry() -> CropGeometry {
        CropGeometry {
            crop_box: Rect::new(50.0, 50.0, 450.0, 550.0),
            bounds: Rect::new(0.0, 0.0, 500.0, 600.0),
            image_width: 3000,
            image_height: 2500,
        }
    }

    proptest! {
        /// Property: the solved box never shrinks below the floor.
        #[test]
        fn prop_solved_box_respects_floor(
            proposed in corner_strategy(),
            aspect in aspect_strategy(),
        ) {
            let geometry = test_geometry();
            let floor = min_box_size(&geometry);

            let solved = solve_edges(
                proposed,
                &geometry,
                aspect,
                &Transform::default(),
                geometry.bounds,
            );

            prop_assert!(solved.crop_box.width() >= floor - 1e-6);
            prop_assert!(solved.crop_box.height() >= floor - 1e-6);
        }

        /// Property: non-Free policies produce the target ratio exactly.
        #[test]
        fn prop_fixed_aspect_is_exact(
            proposed in corner_strategy(),
            aspect in aspect_strategy(),
            rotated in any::<bool>(),
        ) {
            prop_assume!(aspect != AspectRatio::Free);

            let geometry = test_geometry();
            let transform = Transform {
                degrees: if rotated { 90 } else { 0 },
                ..Transform::default()
            };

            let solved = solve_edges(proposed, &geometry, aspect, &transform, geometry.bounds);

            let (aspect_w, aspect_h) = aspect.target_dims(
                (1.0, 1.0),
                (geometry.bounds.width(), geometry.bounds.height()),
                transform.swaps_axes(),
            );

            let got = solved.crop_box.width() / solved.crop_box.height();
            let want = aspect_w / aspect_h;
            prop_assert!(
                (got - want).abs() < 1e-6,
                "ratio {} != target {} for {:?}",
                got,
                want,
                aspect
            );
        }

        /// Property: the undragged corner never moves.
        #[test]
        fn prop_opposite_corner_pinned(
            x in 60.0f64..=540.0,
            y in 60.0f64..=440.0,
            aspect in aspect_strategy(),
        ) {
            let geometry = test_geometry();
            let solved = solve_edges(
                ProposedEdges::top_left(x, y),
                &geometry,
                aspect,
                &Transform::default(),
                geometry.bounds,
            );

            prop_assert_eq!(solved.crop_box.bottom, geometry.crop_box.bottom);
            prop_assert_eq!(solved.crop_box.right, geometry.crop_box.right);
        }

        /// Property: a border slide keeps the bounds size and keeps the box
        /// enclosed, for any pointer delta.
        #[test]
        fn prop_slide_bounds_invariants(
            dx in -2000.0f64..=2000.0,
            dy in -2000.0f64..=2000.0,
        ) {
            let crop_box = Rect::new(120.0, 140.0, 320.0, 360.0);
            let bounds = Rect::new(100.0, 100.0, 500.0, 600.0);

            let moved = slide_bounds(crop_box, bounds, dx, dy);

            prop_assert!((moved.width() - bounds.width()).abs() < 1e-9);
            prop_assert!((moved.height() - bounds.height()).abs() < 1e-9);
            prop_assert!(moved.encloses(&crop_box));
        }
    }
}
