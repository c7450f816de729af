//! Photosave Core - photo normalization pipeline
//!
//! This crate persists a captured photo to storage while normalizing its
//! geometry: it decodes raw image bytes, optionally downsamples to a
//! maximum dimension, applies a rotation derived from a device orientation
//! value, re-encodes as JPEG, and writes the result to a file.
//!
//! The transform step uses a primary/fallback dual strategy: a fast
//! coordinate-remap path is attempted first, and on failure the pipeline
//! re-decodes the source and runs an allocating affine fallback.
//!
//! Background execution and completion callbacks live in the
//! `photosave-tasks` crate; everything here is synchronous and blocking.

pub mod decode;
pub mod encode;
pub mod pipeline;
pub mod storage;
pub mod transform;

pub use decode::{decode_image, DecodeError, PixelBuffer, Rotation};
pub use encode::{encode_jpeg, EncodeError};
pub use pipeline::{
    rotate_photo_in_place, save_photo, save_photo_with_strategy, SaveError, SaveRequest,
    SavedPhoto, TransformStrategy, DEFAULT_COMPRESS_QUALITY,
};
pub use transform::{canonical_rotation, compute_target_size, TransformError};
