//! Image decoding for the save pipeline.
//!
//! This module provides functionality for:
//! - Decoding captured image bytes into an owned RGB pixel buffer
//! - Extracting the rotation implied by EXIF orientation metadata
//!
//! All operations are synchronous and single-threaded; the background
//! execution wrapper lives in the `photosave-tasks` crate.

mod jpeg;
mod types;

pub use jpeg::{decode_image, exif_rotation_degrees};
pub use types::{DecodeError, PixelBuffer, Rotation, BYTES_PER_PIXEL};
