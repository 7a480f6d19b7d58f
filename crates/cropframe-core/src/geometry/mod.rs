//! Screen-space geometry model for the crop canvas.
//!
//! The model tracks two rectangles in container pixel coordinates: the
//! *bounds* (full extent of the displayed image) and the *crop box* (the
//! user's selection). Both live in a single immutable [`CropGeometry`]
//! value that is replaced wholesale by every edit, never mutated in place.
//!
//! # Coordinate System
//!
//! - Origin is the container's top-left corner
//! - Rectangles are edge-addressed: top/left/bottom/right in f64 pixels
//! - Normalized crops are 0-1 ratios of the box relative to the bounds,
//!   which equal ratios of the unrotated source image

mod layout;
mod recenter;
mod rect;

pub use layout::{fit_image, to_normalized, to_screen, CropGeometry};
pub use recenter::{recenter_deltas, RecenterDeltas};
pub use rect::{Rect, RectDeltas, ViewportSize};
