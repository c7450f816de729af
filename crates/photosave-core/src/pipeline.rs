//! End-to-end photo normalization pipeline.
//!
//! Two entry points share one pipeline shape:
//!
//! - [`save_photo`] - take raw captured bytes plus a destination, optionally
//!   downscale, apply the orientation-derived rotation, JPEG-encode, write a
//!   new file.
//! - [`rotate_photo_in_place`] - load an existing file, rotate by a fixed
//!   angle, overwrite the file.
//!
//! Each invocation is a single-threaded, blocking unit of work that reads
//! or writes exactly one file. The transform step tries the fast strategy
//! first and recovers from its failure by re-decoding the source bytes and
//! running the allocating affine fallback; a fallback failure is fatal.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::decode::{self, DecodeError, PixelBuffer, Rotation};
use crate::encode::{encode_jpeg, EncodeError};
use crate::storage;
use crate::transform::{self, canonical_rotation, compute_target_size, TransformError};

/// JPEG quality used when the caller does not supply one.
pub const DEFAULT_COMPRESS_QUALITY: u8 = 90;

/// Errors surfaced by a pipeline invocation.
///
/// Every failure is fatal to the invocation: no output file is produced
/// (overwrites may leave the prior bytes if the write step partially began)
/// and all buffers are released on the way out.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Source unreadable, destination directory uncreatable, or write failed.
    #[error("File access failed: {0}")]
    FileAccess(#[from] std::io::Error),

    /// The input bytes or file are not a valid image.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The encoder rejected the transformed buffer.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The fallback transform strategy itself failed; no further recovery.
    #[error("Fallback transform failed: {0}")]
    Engine(TransformError),
}

/// Parameters for a [`save_photo`] invocation.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    /// Raw encoded bytes from the capture.
    pub bytes: Vec<u8>,
    /// Destination directory; created if absent.
    pub directory: PathBuf,
    /// Destination file name within the directory.
    pub file_name: String,
    /// Device rotation in degrees; `None` means no orientation metadata
    /// (the undefined sentinel) and skips the rotation step entirely.
    pub orientation: Option<f32>,
    /// Optional cap on the larger output dimension. Never upscales.
    pub max_size: Option<u32>,
    /// JPEG quality, conventionally 0-100; out-of-range values are clamped.
    pub quality: u8,
}

impl SaveRequest {
    /// Create a request with the default quality and no size cap.
    pub fn new(
        bytes: Vec<u8>,
        directory: impl Into<PathBuf>,
        file_name: impl Into<String>,
        orientation: Option<f32>,
    ) -> Self {
        Self {
            bytes,
            directory: directory.into(),
            file_name: file_name.into(),
            orientation,
            max_size: None,
            quality: DEFAULT_COMPRESS_QUALITY,
        }
    }

    /// Create a request whose orientation is read from EXIF metadata in the
    /// captured bytes, if any is present.
    pub fn from_capture(
        bytes: Vec<u8>,
        directory: impl Into<PathBuf>,
        file_name: impl Into<String>,
    ) -> Self {
        let orientation = decode::exif_rotation_degrees(&bytes);
        Self::new(bytes, directory, file_name, orientation)
    }

    /// Cap the larger output dimension at `max_size` pixels.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Override the JPEG quality.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }
}

/// The persisted result of a successful pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPhoto {
    /// Full path of the written file.
    pub path: PathBuf,
    /// File name component.
    pub name: String,
}

/// Which transform strategies a pipeline invocation may use.
///
/// The default tries the fast strategy and falls back to the affine one;
/// `AffineOnly` skips the fast attempt, exercising the fallback directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformStrategy {
    /// Fast strategy first, affine fallback on failure.
    #[default]
    FastWithFallback,
    /// Allocating affine strategy only.
    AffineOnly,
}

/// Normalize and persist a captured photo.
///
/// Resolves the destination (creating the directory if needed, aborting
/// before decode on failure), decodes the bytes, computes the scale target
/// from the original dimensions, canonicalizes the orientation, transforms,
/// encodes at the requested quality, and writes `directory/name`.
pub fn save_photo(request: SaveRequest) -> Result<SavedPhoto, SaveError> {
    save_photo_with_strategy(request, TransformStrategy::default())
}

/// [`save_photo`] with an explicit transform strategy.
pub fn save_photo_with_strategy(
    request: SaveRequest,
    strategy: TransformStrategy,
) -> Result<SavedPhoto, SaveError> {
    let total = Instant::now();

    let path = storage::resolve_output_file(&request.directory, &request.file_name)?;

    let started = Instant::now();
    let buffer = decode::decode_image(&request.bytes)?;
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        width = buffer.width,
        height = buffer.height,
        "decoded capture bytes"
    );

    let scale_to = compute_target_size(buffer.width, buffer.height, request.max_size);
    let rotation = request
        .orientation
        .map(canonical_rotation)
        .unwrap_or_default();

    let started = Instant::now();
    let transformed = transform_stage(&request.bytes, buffer, rotation, scale_to, strategy)?;
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        ?rotation,
        ?scale_to,
        "transformed pixel buffer"
    );

    let started = Instant::now();
    let jpeg = encode_jpeg(
        &transformed.pixels,
        transformed.width,
        transformed.height,
        request.quality,
    )?;
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        bytes = jpeg.len(),
        "encoded output"
    );

    storage::write_photo(&path, &jpeg)?;

    debug!(
        elapsed_ms = total.elapsed().as_millis() as u64,
        path = %path.display(),
        "photo saved"
    );

    Ok(SavedPhoto {
        path,
        name: request.file_name,
    })
}

/// Rotate the photo at `path` by `angle` degrees and overwrite the file.
///
/// The angle is canonicalized like any device orientation: unrecognized
/// values degrade to no rotation (the file is still re-encoded at the
/// default quality). A decode failure is reported explicitly rather than
/// silently skipped.
pub fn rotate_photo_in_place(path: &Path, angle: f32) -> Result<SavedPhoto, SaveError> {
    let bytes = fs::read(path)?;
    let buffer = decode::decode_image(&bytes)?;

    let rotation = canonical_rotation(angle);
    let transformed = transform_stage(
        &bytes,
        buffer,
        rotation,
        None,
        TransformStrategy::default(),
    )?;

    let jpeg = encode_jpeg(
        &transformed.pixels,
        transformed.width,
        transformed.height,
        DEFAULT_COMPRESS_QUALITY,
    )?;
    storage::write_photo(path, &jpeg)?;

    debug!(path = %path.display(), ?rotation, "photo rotated in place");

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(SavedPhoto {
        path: path.to_path_buf(),
        name,
    })
}

/// Run the transform step with primary/fallback recovery.
///
/// The fast strategy consumes the buffer, so recovery re-decodes the source
/// bytes to hand the affine fallback a pristine buffer instead of a
/// possibly partially-transformed one.
fn transform_stage(
    bytes: &[u8],
    buffer: PixelBuffer,
    rotation: Rotation,
    scale_to: Option<(u32, u32)>,
    strategy: TransformStrategy,
) -> Result<PixelBuffer, SaveError> {
    let buffer = match strategy {
        TransformStrategy::AffineOnly => buffer,
        TransformStrategy::FastWithFallback => {
            match transform::apply_fast(buffer, rotation, scale_to) {
                Ok(out) => return Ok(out),
                Err(err) => {
                    debug!(error = %err, "fast transform failed, re-decoding for affine fallback");
                    decode::decode_image(bytes)?
                }
            }
        }
    };

    transform::apply_affine(&buffer, rotation, scale_to).map_err(SaveError::Engine)
}
