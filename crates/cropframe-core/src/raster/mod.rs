//! Raster pipeline: preview redraws and full-resolution export.
//!
//! The preview path maps the crop box through the bounds onto the display
//! bitmap and blits the visible sub-rectangle into an output surface sized
//! from the viewport on every call. The export path works on the
//! source-resolution bitmap instead, so the committed crop loses no quality
//! to display scaling.

mod draw;
mod export;

pub use draw::{draw_preview, visible_source_rect, SourceRect, Surface};
pub use export::{crop_pixels, export_crop, orient, ExportError, EXPORT_JPEG_QUALITY};
