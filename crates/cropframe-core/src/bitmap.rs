//! Opaque bitmap storage and decoding.
//!
//! The engine treats the source image as an opaque RGB bitmap. Fetched
//! bytes are decoded here once, with the container format guessed from the
//! data; everything downstream works on raw pixels.

use std::io::Cursor;

use image::ImageReader;
use thiserror::Error;

/// Errors raised while turning raw bytes into a [`Bitmap`].
#[derive(Debug, Error)]
pub enum BitmapError {
    /// The bytes are not a recognizable image container.
    #[error("Unrecognized image data: {0}")]
    UnknownFormat(String),

    /// The container was recognized but the pixel data is bad.
    #[error("Corrupted or unsupported image: {0}")]
    DecodeFailed(String),
}

/// An RGB8 pixel buffer with its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from raw RGB data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode encoded image bytes, guessing the format from the content.
    pub fn decode(bytes: &[u8]) -> Result<Self, BitmapError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BitmapError::UnknownFormat(e.to_string()))?;

        let img = reader
            .decode()
            .map_err(|e| BitmapError::DecodeFailed(e.to_string()))?;

        Ok(Self::from_rgb_image(img.into_rgb8()))
    }

    /// Wrap an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert back to an `image::RgbImage` for crate-level operations.
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
