//! Image encoding for the save pipeline.
//!
//! The output codec is fixed: every persisted photo is JPEG-compressed with
//! a caller-supplied quality setting.

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError};
