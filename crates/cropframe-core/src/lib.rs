//! Cropframe Core - crop-canvas geometry and raster engine
//!
//! This crate provides the pure engine behind the Cropframe editor: the
//! screen-space geometry model for the crop box and its image bounds, the
//! constraint solver applied to drag gestures, the fixed-step settle
//! interpolation, and the raster pipeline for preview redraws and
//! full-resolution export.
//!
//! Everything here is side-effect free. Clocks, pointer events, and network
//! I/O live in the host crate (`cropframe-editor`); this crate only computes.

pub mod animate;
pub mod bitmap;
pub mod constraint;
pub mod encode;
pub mod geometry;
pub mod raster;

pub use animate::{Settle, SettleStep};
pub use bitmap::{Bitmap, BitmapError};
pub use constraint::{min_box_size, slide_bounds, solve_edges, ProposedEdges};
pub use geometry::{
    fit_image, recenter_deltas, to_normalized, to_screen, CropGeometry, Rect, RectDeltas,
    RecenterDeltas, ViewportSize,
};
pub use encode::{encode_jpeg, encode_png, EncodeError};
pub use raster::{draw_preview, export_crop, visible_source_rect, ExportError, Surface};

/// Rotation and flip state supplied by the external collaborator.
///
/// `degrees` is a multiple of 90; odd quarter-turns swap the effective
/// width/height used for aspect-ratio and export math. `scale_x`/`scale_y`
/// are flip flags (±1).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Rotation in degrees, a multiple of 90.
    pub degrees: i32,
    /// Horizontal flip flag: 1.0 or -1.0.
    pub scale_x: f64,
    /// Vertical flip flag: 1.0 or -1.0.
    pub scale_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            degrees: 0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Transform {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Returns true if the rotation is an odd multiple of 90 degrees,
    /// swapping the effective width/height.
    #[inline]
    pub fn swaps_axes(&self) -> bool {
        self.degrees.rem_euclid(180) != 0
    }

    /// Number of clockwise quarter turns in 0..4.
    #[inline]
    pub fn quarter_turns(&self) -> i32 {
        self.degrees.rem_euclid(360) / 90
    }

    /// Returns true if the horizontal flip flag is set.
    #[inline]
    pub fn flips_horizontal(&self) -> bool {
        self.scale_x < 0.0
    }

    /// Returns true if the vertical flip flag is set.
    #[inline]
    pub fn flips_vertical(&self) -> bool {
        self.scale_y < 0.0
    }
}

/// Crop rectangle expressed as ratios (0-1) of the unrotated source image.
///
/// This is the persisted representation exchanged with the external state
/// collaborator; the screen-space crop box is its projection through the
/// current bounds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NormalizedCrop {
    pub top_ratio: f64,
    pub left_ratio: f64,
    pub width_ratio: f64,
    pub height_ratio: f64,
}

impl Default for NormalizedCrop {
    fn default() -> Self {
        Self::full()
    }
}

impl NormalizedCrop {
    pub fn new(top_ratio: f64, left_ratio: f64, width_ratio: f64, height_ratio: f64) -> Self {
        Self {
            top_ratio,
            left_ratio,
            width_ratio,
            height_ratio,
        }
    }

    /// The whole image: `{0, 0, 1, 1}`.
    pub fn full() -> Self {
        Self {
            top_ratio: 0.0,
            left_ratio: 0.0,
            width_ratio: 1.0,
            height_ratio: 1.0,
        }
    }

    /// Check whether this crop selects (approximately) the whole image.
    pub fn is_full(&self) -> bool {
        const EPS: f64 = 1e-9;
        self.top_ratio.abs() < EPS
            && self.left_ratio.abs() < EPS
            && (self.width_ratio - 1.0).abs() < EPS
            && (self.height_ratio - 1.0).abs() < EPS
    }

    /// Clamp all ratios into the valid `[0, 1]` range.
    pub fn clamped(self) -> Self {
        Self {
            top_ratio: self.top_ratio.clamp(0.0, 1.0),
            left_ratio: self.left_ratio.clamp(0.0, 1.0),
            width_ratio: self.width_ratio.clamp(0.0, 1.0),
            height_ratio: self.height_ratio.clamp(0.0, 1.0),
        }
    }
}

/// Aspect-ratio policy applied by the constraint solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    /// No ratio constraint; the dragged size is used as-is.
    #[default]
    Free,
    /// Match the displayed image bounds ratio.
    Original,
    /// 1:1
    Square,
    /// 16:9
    Ratio16x9,
    /// 4:3
    Ratio4x3,
    /// 3:2
    Ratio3x2,
}

impl AspectRatio {
    /// Resolve the target aspect width/height for this policy.
    ///
    /// `unconstrained` is the hypothetical box size after the drag,
    /// `bounds` the displayed image size. Fixed ratios swap width and
    /// height when `swap_axes` is set (rotation by an odd multiple of 90).
    pub fn target_dims(
        self,
        unconstrained: (f64, f64),
        bounds: (f64, f64),
        swap_axes: bool,
    ) -> (f64, f64) {
        let fixed = |w: f64, h: f64| if swap_axes { (h, w) } else { (w, h) };
        match self {
            AspectRatio::Free => unconstrained,
            AspectRatio::Original => bounds,
            AspectRatio::Square => (1.0, 1.0),
            AspectRatio::Ratio16x9 => fixed(16.0, 9.0),
            AspectRatio::Ratio4x3 => fixed(4.0, 3.0),
            AspectRatio::Ratio3x2 => fixed(3.0, 2.0),
        }
    }
}
