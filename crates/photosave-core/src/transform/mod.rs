//! Pixel buffer transforms: downscale and canonical rotation.
//!
//! Two strategies implement the same transform contract:
//!
//! 1. **Fast** (`apply_fast`) - bilinear scale followed by exact
//!    coordinate-remap rotation. Consumes the buffer and is always attempted
//!    first.
//! 2. **Affine** (`apply_affine`) - scale and rotation combined into a
//!    single inverse-mapped affine transform with bilinear resampling into a
//!    freshly allocated buffer.
//!
//! A fast-strategy failure is recoverable: the pipeline re-decodes the
//! source bytes and runs the affine fallback on the pristine buffer, because
//! the fast path may already have consumed or partially transformed the
//! original. A fallback failure is fatal; there is no third strategy.
//!
//! # Transform Order
//!
//! Scaling targets are computed from the pre-rotation dimensions and applied
//! before rotation, so a quarter turn swaps the final output dimensions.

mod affine;
mod rotation;
mod scale;

pub use rotation::canonical_rotation;
pub use scale::compute_target_size;

use thiserror::Error;

use crate::decode::{PixelBuffer, Rotation};

/// Errors produced by either transform strategy.
///
/// From the fast strategy these are recoverable (the caller falls back to
/// the affine strategy); from the affine strategy they are fatal.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Allocation of a target pixel buffer failed.
    #[error("Pixel buffer allocation of {bytes} bytes failed")]
    OutOfMemory { bytes: usize },

    /// The buffer's pixel data length does not match its dimensions.
    #[error("Inconsistent pixel buffer: {width}x{height} with {len} bytes")]
    BufferMismatch { width: u32, height: u32, len: usize },

    /// The requested target dimensions cannot be produced.
    #[error("Invalid transform target: {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
}

/// Fast transform strategy: scale, then remap-rotate. Consumes the buffer.
///
/// `scale_to` is the pre-rotation target size, typically from
/// [`compute_target_size`]. On error the buffer is gone; callers that need
/// to recover must re-decode and use [`apply_affine`].
pub fn apply_fast(
    buffer: PixelBuffer,
    rotation: Rotation,
    scale_to: Option<(u32, u32)>,
) -> Result<PixelBuffer, TransformError> {
    let buffer = match scale_to {
        Some((w, h)) => scale::scale_bilinear(buffer, w, h)?,
        None => buffer,
    };
    rotation::rotate_fast(buffer, rotation)
}

/// Allocating fallback strategy: one combined affine transform.
///
/// Borrows the source buffer untouched and always produces a new buffer of
/// the target size. Strictly slower than [`apply_fast`].
pub fn apply_affine(
    buffer: &PixelBuffer,
    rotation: Rotation,
    scale_to: Option<(u32, u32)>,
) -> Result<PixelBuffer, TransformError> {
    affine::apply(buffer, rotation, scale_to)
}
