//! Downscale policy and bilinear resize.
//!
//! The size policy caps the dominant dimension at a maximum and scales the
//! other proportionally. It never upscales: an image whose dimensions are
//! already within the cap passes through untouched. On a width/height tie
//! the width branch wins, matching the behavior callers have depended on.

use image::imageops;

use crate::decode::{PixelBuffer, BYTES_PER_PIXEL};

use super::TransformError;

/// Compute the target size for an optional maximum-dimension cap.
///
/// Returns `None` when no scaling is needed: the cap is unset, or neither
/// dimension exceeds it (equal to the cap is not oversized). Otherwise
/// returns `(target_width, target_height)` with the dominant dimension set
/// to the cap and the other rounded from the aspect ratio, floored at 1.
pub fn compute_target_size(width: u32, height: u32, max_dim: Option<u32>) -> Option<(u32, u32)> {
    let max = max_dim?;

    if width >= height && width > max {
        let ratio = height as f64 / width as f64;
        let target_height = (max as f64 * ratio).round() as u32;
        Some((max, target_height.max(1)))
    } else if height > width && height > max {
        let ratio = width as f64 / height as f64;
        let target_width = (max as f64 * ratio).round() as u32;
        Some((target_width.max(1), max))
    } else {
        None
    }
}

/// Bilinear resize to exact target dimensions; consumes the buffer.
pub(crate) fn scale_bilinear(
    buffer: PixelBuffer,
    target_width: u32,
    target_height: u32,
) -> Result<PixelBuffer, TransformError> {
    if target_width == 0 || target_height == 0 {
        return Err(TransformError::InvalidTarget {
            width: target_width,
            height: target_height,
        });
    }

    if buffer.width == target_width && buffer.height == target_height {
        return Ok(buffer);
    }

    // Guard the output allocation size before handing off to imageops
    (target_width as usize)
        .checked_mul(target_height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(TransformError::InvalidTarget {
            width: target_width,
            height: target_height,
        })?;

    let (width, height, len) = (buffer.width, buffer.height, buffer.pixels.len());
    let img = buffer
        .into_rgb_image()
        .ok_or(TransformError::BufferMismatch { width, height, len })?;

    let resized = imageops::resize(
        &img,
        target_width,
        target_height,
        imageops::FilterType::Triangle,
    );

    Ok(PixelBuffer::from_rgb_image(resized))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a computed target never exceeds the cap and never
        /// upscales the dominant dimension.
        #[test]
        fn prop_target_bounded_by_cap(
            width in 1u32..=8192,
            height in 1u32..=8192,
            max in 1u32..=4096,
        ) {
            match compute_target_size(width, height, Some(max)) {
                Some((tw, th)) => {
                    prop_assert!(tw <= max && th <= max);
                    prop_assert!(tw >= 1 && th >= 1);
                    prop_assert!(width > max || height > max);
                }
                None => {
                    prop_assert!(width <= max && height <= max);
                }
            }
        }
    }
}
