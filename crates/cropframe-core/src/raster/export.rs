//! Full-resolution export of the committed crop.
//!
//! Export never touches the display-scaled bitmap: the source-resolution
//! bitmap is oriented by the transform, the normalized crop is projected
//! onto the oriented dimensions (odd quarter turns having swapped them),
//! and the extracted pixels are encoded at full quality.

use image::DynamicImage;
use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::encode::{encode_jpeg, encode_png, EncodeError};
use crate::{NormalizedCrop, Transform};

/// JPEG quality used for exports.
pub const EXPORT_JPEG_QUALITY: u8 = 100;

/// Errors raised while producing the output image buffer.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The bitmap's pixel buffer does not match its dimensions.
    #[error("Bitmap pixel buffer does not match its dimensions")]
    MalformedBitmap,

    /// Encoding the extracted pixels failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Apply the transform's quarter-turn rotation and flips to a bitmap.
///
/// Rotation is applied first, then the flips, matching the preview's
/// sampling order.
pub fn orient(bitmap: &Bitmap, transform: &Transform) -> Result<Bitmap, ExportError> {
    let rgb = bitmap.to_rgb_image().ok_or(ExportError::MalformedBitmap)?;
    let mut img = DynamicImage::ImageRgb8(rgb);

    img = match transform.quarter_turns() {
        1 => img.rotate90(),
        2 => img.rotate180(),
        3 => img.rotate270(),
        _ => img,
    };
    if transform.flips_horizontal() {
        img = img.fliph();
    }
    if transform.flips_vertical() {
        img = img.flipv();
    }

    Ok(Bitmap::from_rgb_image(img.into_rgb8()))
}

/// Extract a normalized crop from a bitmap as raw pixels.
///
/// Ratios are clamped to [0, 1] and the pixel rectangle to the bitmap
/// bounds; the output is never smaller than 1x1.
pub fn crop_pixels(bitmap: &Bitmap, crop: NormalizedCrop) -> Bitmap {
    let crop = crop.clamped();
    if crop.is_full() {
        return bitmap.clone();
    }

    let src_width = bitmap.width as f64;
    let src_height = bitmap.height as f64;

    let left = ((crop.left_ratio * src_width).round() as u32).min(bitmap.width.saturating_sub(1));
    let top = ((crop.top_ratio * src_height).round() as u32).min(bitmap.height.saturating_sub(1));
    let right = (left + (crop.width_ratio * src_width).round() as u32).min(bitmap.width);
    let bottom = (top + (crop.height_ratio * src_height).round() as u32).min(bitmap.height);

    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);

    let row_bytes = (out_width as usize) * 3;
    let src_stride = (bitmap.width as usize) * 3;
    let mut pixels = vec![0u8; row_bytes * out_height as usize];

    for row in 0..out_height as usize {
        let src_start = (top as usize + row) * src_stride + (left as usize) * 3;
        let dst_start = row * row_bytes;
        pixels[dst_start..dst_start + row_bytes]
            .copy_from_slice(&bitmap.pixels[src_start..src_start + row_bytes]);
    }

    Bitmap::new(out_width, out_height, pixels)
}

/// Produce the final output image buffer for a committed crop.
///
/// The mime type selects the container: `image/jpeg` encodes JPEG at
/// [`EXPORT_JPEG_QUALITY`], anything else encodes lossless PNG.
pub fn export_crop(
    source: &Bitmap,
    transform: &Transform,
    crop: NormalizedCrop,
    mime_type: &str,
) -> Result<Vec<u8>, ExportError> {
    let oriented = orient(source, transform)?;
    let cropped = crop_pixels(&oriented, crop);

    let bytes = match mime_type {
        "image/jpeg" | "image/jpg" => encode_jpeg(
            &cropped.pixels,
            cropped.width,
            cropped.height,
            EXPORT_JPEG_QUALITY,
        )?,
        _ => encode_png(&cropped.pixels, cropped.width, cropped.height)?,
    };

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bitmap where each pixel's red channel encodes its position.
    fn positional(width: u32, height: u32) -> Bitmap {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        Bitmap::new(width, height, pixels)
    }

    #[test]
    fn test_orient_identity() {
        let bitmap = positional(6, 4);
        let oriented = orient(&bitmap, &Transform::default()).unwrap();
        assert_eq!(oriented, bitmap);
    }

    #[test]
    fn test_orient_quarter_turn_swaps_dimensions() {
        let bitmap = positional(6, 4);

        let quarter = Transform {
            degrees: 90,
            ..Transform::default()
        };
        let oriented = orient(&bitmap, &quarter).unwrap();
        assert_eq!(oriented.width, 4);
        assert_eq!(oriented.height, 6);

        let half = Transform {
            degrees: 180,
            ..Transform::default()
        };
        let oriented = orient(&bitmap, &half).unwrap();
        assert_eq!(oriented.width, 6);
        assert_eq!(oriented.height, 4);
    }

    #[test]
    fn test_orient_flip_mirrors_pixels() {
        let bitmap = positional(4, 1);
        let flipped = orient(
            &bitmap,
            &Transform {
                scale_x: -1.0,
                ..Transform::default()
            },
        )
        .unwrap();

        // Row 0 1 2 3 becomes 3 2 1 0
        assert_eq!(flipped.pixels[0], 3);
        assert_eq!(flipped.pixels[3], 2);
        assert_eq!(flipped.pixels[6], 1);
        assert_eq!(flipped.pixels[9], 0);
    }

    #[test]
    fn test_crop_pixels_full_is_identity() {
        let bitmap = positional(10, 10);
        let cropped = crop_pixels(&bitmap, NormalizedCrop::full());
        assert_eq!(cropped, bitmap);
    }

    #[test]
    fn test_crop_pixels_center() {
        let bitmap = positional(10, 10);
        let cropped = crop_pixels(&bitmap, NormalizedCrop::new(0.2, 0.2, 0.6, 0.6));

        assert_eq!(cropped.width, 6);
        assert_eq!(cropped.height, 6);
        // First pixel comes from (2, 2): value 22
        assert_eq!(cropped.pixels[0], 22);
    }

    #[test]
    fn test_crop_pixels_clamps_overhang() {
        let bitmap = positional(10, 10);
        let cropped = crop_pixels(&bitmap, NormalizedCrop::new(0.8, 0.8, 0.5, 0.5));

        assert_eq!(cropped.width, 2);
        assert_eq!(cropped.height, 2);
    }

    #[test]
    fn test_crop_pixels_never_degenerate() {
        let bitmap = positional(10, 10);
        let cropped = crop_pixels(&bitmap, NormalizedCrop::new(0.99, 0.99, 0.0, 0.0));

        assert!(cropped.width >= 1);
        assert!(cropped.height >= 1);
    }

    #[test]
    fn test_export_full_crop_round_trips() {
        let bitmap = positional(12, 8);
        let bytes = export_crop(
            &bitmap,
            &Transform::default(),
            NormalizedCrop::full(),
            "image/png",
        )
        .unwrap();

        let decoded = Bitmap::decode(&bytes).unwrap();
        assert_eq!(decoded, bitmap);
    }

    #[test]
    fn test_export_mime_selects_container() {
        let bitmap = positional(12, 8);
        let crop = NormalizedCrop::new(0.0, 0.0, 0.5, 0.5);

        let jpeg = export_crop(&bitmap, &Transform::default(), crop, "image/jpeg").unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

        let png = export_crop(&bitmap, &Transform::default(), crop, "image/webp").unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_export_rotated_crop_uses_swapped_dimensions() {
        // 12x8 source rotated a quarter turn is 8x12; a half-width,
        // full-height crop of the rotated image is 4x12.
        let bitmap = positional(12, 8);
        let rotated = Transform {
            degrees: 90,
            ..Transform::default()
        };

        let bytes = export_crop(
            &bitmap,
            &rotated,
            NormalizedCrop::new(0.0, 0.0, 0.5, 1.0),
            "image/png",
        )
        .unwrap();

        let decoded = Bitmap::decode(&bytes).unwrap();
        assert_eq!(decoded.width, 4);
        assert_eq!(decoded.height, 12);
    }

    #[test]
    fn test_export_unrotated_crop_does_not_swap() {
        let bitmap = positional(12, 8);
        let bytes = export_crop(
            &bitmap,
            &Transform {
                degrees: 180,
                ..Transform::default()
            },
            NormalizedCrop::new(0.0, 0.0, 0.5, 1.0),
            "image/png",
        )
        .unwrap();

        let decoded = Bitmap::decode(&bytes).unwrap();
        assert_eq!(decoded.width, 6);
        assert_eq!(decoded.height, 8);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
