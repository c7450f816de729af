//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes per pixel for the fixed RGB8 buffer format.
pub const BYTES_PER_PIXEL: usize = 3;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is empty.
    #[error("Empty input: no image bytes to decode")]
    EmptyInput,

    /// The byte stream is not a recognized image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image data is corrupted or incomplete.
    #[error("Corrupted or incomplete image data: {0}")]
    CorruptedData(String),
}

/// Canonical rotation classes for captured photos.
///
/// Only four rotation classes are meaningful; any other reported angle is
/// treated as "no rotation". An absent orientation value (the undefined
/// sentinel) means the rotation step is skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Identity,
    /// Rotate 90 degrees clockwise.
    Cw90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 90 degrees counter-clockwise.
    Ccw90,
}

impl Rotation {
    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Cw90 | Rotation::Ccw90)
    }

    /// The clockwise rotation angle in degrees (screen coordinates, y down).
    pub fn degrees(self) -> f64 {
        match self {
            Rotation::Identity => 0.0,
            Rotation::Cw90 => 90.0,
            Rotation::Rotate180 => 180.0,
            Rotation::Ccw90 => 270.0,
        }
    }
}

/// An owned, decoded image with RGB pixel data.
///
/// Invariant: `pixels.len() == width * height * BYTES_PER_PIXEL`. All
/// transforms either mutate the buffer in place or consume it and return a
/// new buffer satisfying the same invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new PixelBuffer with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * BYTES_PER_PIXEL,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a PixelBuffer from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Consume the buffer and convert it into an image::RgbImage.
    ///
    /// Returns `None` only if the length invariant is violated.
    pub fn into_rgb_image(self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Check the length invariant against the stored dimensions.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }
}
