//! Allocating affine fallback transform.
//!
//! When the fast strategy fails, scale and rotation are combined into a
//! single inverse-mapped affine transform: for each output pixel the source
//! coordinate is computed by undoing the rotation about the image center and
//! dividing out the scale factors, then sampled with bilinear interpolation.
//! Sampling coordinates are clamped to the source bounds so exact quarter
//! turns do not pick up dark borders from out-of-range reads.
//!
//! This path always allocates a fresh output buffer and is strictly slower
//! than the fast strategy, but it succeeds for any consistent input buffer.

use crate::decode::{PixelBuffer, Rotation, BYTES_PER_PIXEL};

use super::TransformError;

/// Apply scale and rotation as one affine transform into a new buffer.
///
/// `scale_to` is the pre-rotation target size; quarter turns swap the final
/// output dimensions. The source buffer is borrowed untouched, which lets
/// the caller hand over a freshly re-decoded buffer after a failed fast
/// attempt.
pub(crate) fn apply(
    src: &PixelBuffer,
    rotation: Rotation,
    scale_to: Option<(u32, u32)>,
) -> Result<PixelBuffer, TransformError> {
    if !src.is_consistent() || src.is_empty() {
        return Err(TransformError::BufferMismatch {
            width: src.width,
            height: src.height,
            len: src.pixels.len(),
        });
    }

    let (scaled_w, scaled_h) = scale_to.unwrap_or((src.width, src.height));
    if scaled_w == 0 || scaled_h == 0 {
        return Err(TransformError::InvalidTarget {
            width: scaled_w,
            height: scaled_h,
        });
    }

    let (out_w, out_h) = if rotation.swaps_dimensions() {
        (scaled_h, scaled_w)
    } else {
        (scaled_w, scaled_h)
    };

    let out_len = (out_w as usize)
        .checked_mul(out_h as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(TransformError::InvalidTarget {
            width: out_w,
            height: out_h,
        })?;

    let mut out: Vec<u8> = Vec::new();
    out.try_reserve_exact(out_len)
        .map_err(|_| TransformError::OutOfMemory { bytes: out_len })?;
    out.resize(out_len, 0);

    // Clockwise rotation in y-down screen coordinates uses the standard
    // [cos -sin; sin cos] matrix; the inverse is its transpose.
    let theta = rotation.degrees().to_radians();
    let (sin, cos) = theta.sin_cos();

    let sx = scaled_w as f64 / src.width as f64;
    let sy = scaled_h as f64 / src.height as f64;

    let dst_cx = out_w as f64 / 2.0;
    let dst_cy = out_h as f64 / 2.0;
    let scaled_cx = scaled_w as f64 / 2.0;
    let scaled_cy = scaled_h as f64 / 2.0;

    for y in 0..out_h {
        for x in 0..out_w {
            let dx = x as f64 + 0.5 - dst_cx;
            let dy = y as f64 + 0.5 - dst_cy;

            // Inverse rotation into scaled space, then inverse scale into
            // source space (pixel-center convention)
            let rx = dx * cos + dy * sin + scaled_cx;
            let ry = -dx * sin + dy * cos + scaled_cy;
            let src_x = rx / sx - 0.5;
            let src_y = ry / sy - 0.5;

            let pixel = sample_bilinear(src, src_x, src_y);
            let dst = ((y * out_w + x) as usize) * BYTES_PER_PIXEL;
            out[dst..dst + BYTES_PER_PIXEL].copy_from_slice(&pixel);
        }
    }

    Ok(PixelBuffer::new(out_w, out_h, out))
}

/// Get a pixel as [f64; 3] at the given integer coordinates.
#[inline]
fn get_pixel_f64(src: &PixelBuffer, px: usize, py: usize) -> [f64; 3] {
    let idx = (py * src.width as usize + px) * BYTES_PER_PIXEL;
    [
        src.pixels[idx] as f64,
        src.pixels[idx + 1] as f64,
        src.pixels[idx + 2] as f64,
    ]
}

/// Sample a pixel using bilinear interpolation with edge clamping.
///
/// Coordinates outside the image are clamped to the border pixel rather
/// than treated as black, so exact 90-degree multiples reproduce edge rows
/// and columns faithfully.
fn sample_bilinear(src: &PixelBuffer, x: f64, y: f64) -> [u8; 3] {
    let max_x = (src.width - 1) as f64;
    let max_y = (src.height - 1) as f64;

    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(src.width as usize - 1);
    let y1 = (y0 + 1).min(src.height as usize - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(src, x0, y0);
    let p10 = get_pixel_f64(src, x1, y0);
    let p01 = get_pixel_f64(src, x0, y1);
    let p11 = get_pixel_f64(src, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
