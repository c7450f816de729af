//! Image decoding and EXIF orientation extraction.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::ImageReader;

use super::{DecodeError, PixelBuffer};

/// Decode captured image bytes into an RGB pixel buffer.
///
/// The container format is guessed from the byte stream; camera captures are
/// JPEG in practice but the decoder does not insist on it.
///
/// # Errors
///
/// Returns `DecodeError::EmptyInput` for an empty byte slice,
/// `DecodeError::InvalidFormat` if the format cannot be recognized, and
/// `DecodeError::CorruptedData` if decoding fails partway.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let cursor = Cursor::new(bytes);
    let reader = ImageReader::new(cursor)
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedData(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedData(e.to_string()))?;

    Ok(PixelBuffer::from_rgb_image(img.into_rgb8()))
}

/// Extract the rotation implied by EXIF orientation metadata, in degrees.
///
/// Maps the pure-rotation EXIF codes to clockwise degrees:
/// 1 → 0, 3 → 180, 6 → 90, 8 → 270. Returns `None` when the bytes carry no
/// usable orientation metadata (the "undefined" sentinel) or when the code
/// involves mirroring (2, 4, 5, 7), which this pipeline does not model.
pub fn exif_rotation_degrees(bytes: &[u8]) -> Option<f32> {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    let exif = exif_reader.read_from_container(&mut cursor).ok()?;
    let field = exif.get_field(Tag::Orientation, In::PRIMARY)?;

    match field.value.get_uint(0)? {
        1 => Some(0.0),
        3 => Some(180.0),
        6 => Some(90.0),
        8 => Some(270.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal valid JPEG bytes (1x1 pixel), no EXIF segment.
    pub(crate) const MINIMAL_JPEG: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00,
        0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43, 0x00, 0x08, 0x06, 0x06, 0x07, 0x06,
        0x05, 0x08, 0x07, 0x07, 0x07, 0x09, 0x09, 0x08, 0x0A, 0x0C, 0x14, 0x0D, 0x0C, 0x0B, 0x0B,
        0x0C, 0x19, 0x12, 0x13, 0x0F, 0x14, 0x1D, 0x1A, 0x1F, 0x1E, 0x1D, 0x1A, 0x1C, 0x1C, 0x20,
        0x24, 0x2E, 0x27, 0x20, 0x22, 0x2C, 0x23, 0x1C, 0x1C, 0x28, 0x37, 0x29, 0x2C, 0x30, 0x31,
        0x34, 0x34, 0x34, 0x1F, 0x27, 0x39, 0x3D, 0x38, 0x32, 0x3C, 0x2E, 0x33, 0x34, 0x32, 0xFF,
        0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00, 0xFF, 0xC4, 0x00,
        0x1F, 0x00, 0x00, 0x01, 0x05, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B,
        0xFF, 0xC4, 0x00, 0xB5, 0x10, 0x00, 0x02, 0x01, 0x03, 0x03, 0x02, 0x04, 0x03, 0x05, 0x05,
        0x04, 0x04, 0x00, 0x00, 0x01, 0x7D, 0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21,
        0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07, 0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xA1, 0x08,
        0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0, 0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0A,
        0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28, 0x29, 0x2A, 0x34, 0x35, 0x36, 0x37,
        0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55, 0x56,
        0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74, 0x75,
        0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8A, 0x92, 0x93,
        0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9,
        0xAA, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6,
        0xC7, 0xC8, 0xC9, 0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2,
        0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7,
        0xF8, 0xF9, 0xFA, 0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00, 0xFB, 0xD5,
        0xDB, 0x20, 0xA8, 0xF1, 0x7E, 0xFF, 0xD9,
    ];

    #[test]
    fn test_decode_valid_jpeg() {
        let result = decode_image(MINIMAL_JPEG);
        assert!(result.is_ok(), "Failed to decode valid JPEG: {:?}", result);

        let buf = result.unwrap();
        assert_eq!(buf.width, 1);
        assert_eq!(buf.height, 1);
        assert_eq!(buf.pixels.len(), 3);
        assert!(buf.is_consistent());
    }

    #[test]
    fn test_decode_empty_bytes() {
        let result = decode_image(&[]);
        assert!(matches!(result, Err(DecodeError::EmptyInput)));
    }

    #[test]
    fn test_decode_unrecognized_bytes() {
        // Not a known image container
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_truncated_jpeg() {
        let truncated = &MINIMAL_JPEG[0..20];
        let result = decode_image(truncated);
        assert!(result.is_err());
    }

    /// Splice an APP1 Exif segment carrying the given orientation code into
    /// the minimal JPEG, right after the SOI marker.
    fn jpeg_with_orientation(code: u8) -> Vec<u8> {
        // Little-endian TIFF with a single IFD0 entry: tag 0x0112
        // (Orientation), type SHORT, count 1
        #[rustfmt::skip]
        let app1 = [
            0xFF, 0xE1, 0x00, 0x22,
            b'E', b'x', b'i', b'f', 0x00, 0x00,
            b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00,
            0x01, 0x00,
            0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, code, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];

        let mut bytes = Vec::with_capacity(MINIMAL_JPEG.len() + app1.len());
        bytes.extend_from_slice(&MINIMAL_JPEG[0..2]);
        bytes.extend_from_slice(&app1);
        bytes.extend_from_slice(&MINIMAL_JPEG[2..]);
        bytes
    }

    #[test]
    fn test_exif_rotation_code_mapping() {
        assert_eq!(exif_rotation_degrees(&jpeg_with_orientation(1)), Some(0.0));
        assert_eq!(
            exif_rotation_degrees(&jpeg_with_orientation(3)),
            Some(180.0)
        );
        assert_eq!(exif_rotation_degrees(&jpeg_with_orientation(6)), Some(90.0));
        assert_eq!(
            exif_rotation_degrees(&jpeg_with_orientation(8)),
            Some(270.0)
        );
    }

    #[test]
    fn test_exif_rotation_rejects_mirrored_codes() {
        for code in [2u8, 4, 5, 7] {
            assert_eq!(exif_rotation_degrees(&jpeg_with_orientation(code)), None);
        }
    }

    #[test]
    fn test_exif_rotation_no_metadata() {
        // The minimal JPEG has no EXIF segment, so orientation is undefined
        assert_eq!(exif_rotation_degrees(MINIMAL_JPEG), None);
    }

    #[test]
    fn test_exif_rotation_invalid_data() {
        assert_eq!(exif_rotation_degrees(&[0x00, 0x01, 0x02]), None);
    }
}
