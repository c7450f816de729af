//! Angle canonicalization and fast quarter-turn rotation.
//!
//! Device orientation arrives as a float angle of any sign and magnitude.
//! Only four physical rotations are recognized; everything else degrades to
//! no rotation rather than failing, so malformed orientation metadata never
//! blocks a save.
//!
//! The rotation functions here are the fast strategy: exact coordinate
//! remapping with no interpolation. 180 degrees reverses the pixel array in
//! place; quarter turns remap into a new buffer with width and height
//! swapped.

use crate::decode::{PixelBuffer, Rotation, BYTES_PER_PIXEL};

use super::TransformError;

/// Map an arbitrary rotation angle to one of the four canonical rotations.
///
/// The angle is reduced modulo 360 and truncated toward zero, so fractional
/// degrees are dropped, not rounded. Both signs of each physical rotation
/// are accepted: 90 and -270 are a clockwise quarter turn, 270 and -90 a
/// counter-clockwise one, 180 and -180 a half turn. Any other value,
/// including NaN and infinities (which truncate to 0), yields
/// `Rotation::Identity`.
pub fn canonical_rotation(angle_degrees: f32) -> Rotation {
    match (angle_degrees % 360.0) as i32 {
        90 | -270 => Rotation::Cw90,
        180 | -180 => Rotation::Rotate180,
        270 | -90 => Rotation::Ccw90,
        _ => Rotation::Identity,
    }
}

/// Apply a canonical rotation using exact coordinate remapping.
///
/// Consumes the buffer. Quarter turns allocate a same-sized target buffer
/// (checked; allocation failure is a recoverable `TransformError`); the half
/// turn mutates the pixel array in place.
pub(crate) fn rotate_fast(
    buffer: PixelBuffer,
    rotation: Rotation,
) -> Result<PixelBuffer, TransformError> {
    match rotation {
        Rotation::Identity => Ok(buffer),
        Rotation::Rotate180 => {
            let mut buffer = buffer;
            rotate_180_in_place(&mut buffer);
            Ok(buffer)
        }
        Rotation::Cw90 => rotate_quarter(buffer, true),
        Rotation::Ccw90 => rotate_quarter(buffer, false),
    }
}

/// Reverse the pixel array in place; dimensions are unchanged.
pub(crate) fn rotate_180_in_place(buffer: &mut PixelBuffer) {
    let n = buffer.pixel_count();
    let px = &mut buffer.pixels;
    for i in 0..n / 2 {
        let a = i * BYTES_PER_PIXEL;
        let b = (n - 1 - i) * BYTES_PER_PIXEL;
        for k in 0..BYTES_PER_PIXEL {
            px.swap(a + k, b + k);
        }
    }
}

/// Quarter-turn rotation by coordinate remapping; swaps width and height.
fn rotate_quarter(buffer: PixelBuffer, clockwise: bool) -> Result<PixelBuffer, TransformError> {
    if !buffer.is_consistent() {
        return Err(TransformError::BufferMismatch {
            width: buffer.width,
            height: buffer.height,
            len: buffer.pixels.len(),
        });
    }

    let w = buffer.width as usize;
    let h = buffer.height as usize;
    let len = buffer.pixels.len();

    let mut out: Vec<u8> = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| TransformError::OutOfMemory { bytes: len })?;
    out.resize(len, 0);

    for y in 0..h {
        for x in 0..w {
            let src = (y * w + x) * BYTES_PER_PIXEL;
            // Rotated image has width h; cw: (x, y) -> (h-1-y, x),
            // ccw: (x, y) -> (y, w-1-x)
            let dst = if clockwise {
                (x * h + (h - 1 - y)) * BYTES_PER_PIXEL
            } else {
                ((w - 1 - x) * h + y) * BYTES_PER_PIXEL
            };
            out[dst..dst + BYTES_PER_PIXEL]
                .copy_from_slice(&buffer.pixels[src..src + BYTES_PER_PIXEL]);
        }
    }

    Ok(PixelBuffer::new(buffer.height, buffer.width, out))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: canonicalization is 360-periodic for whole-degree
        /// angles (exact in f32 well past this range).
        #[test]
        fn prop_canonical_rotation_periodic(angle in -10_000i32..10_000) {
            let angle = angle as f32;
            let base = canonical_rotation(angle);
            prop_assert_eq!(canonical_rotation(angle + 360.0), base);
            prop_assert_eq!(canonical_rotation(angle - 360.0), base);
        }

        /// Property: every angle maps to one of the four canonical states
        /// and quarter turns always swap dimensions.
        #[test]
        fn prop_rotation_dimension_law(
            angle in any::<f32>(),
            w in 1u32..=16,
            h in 1u32..=16,
        ) {
            let rotation = canonical_rotation(angle);
            let img = PixelBuffer::new(w, h, vec![0u8; (w * h * 3) as usize]);
            let out = rotate_fast(img, rotation).unwrap();

            if rotation.swaps_dimensions() {
                prop_assert_eq!((out.width, out.height), (h, w));
            } else {
                prop_assert_eq!((out.width, out.height), (w, h));
            }
            prop_assert!(out.is_consistent());
        }
    }
}
