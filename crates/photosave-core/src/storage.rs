//! Output file resolution and writing.
//!
//! The pipeline's only persistent side effect is a single file per
//! invocation. Writes are plain and non-atomic: a failure partway leaves
//! whatever bytes were already flushed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolve the output file path for a save, creating the destination
/// directory tree if it does not exist.
///
/// # Errors
///
/// Propagates the io error when the directory cannot be created (storage
/// unavailable, permissions). Callers treat this as a file-access failure
/// and abort before decoding.
pub fn resolve_output_file(directory: &Path, name: &str) -> io::Result<PathBuf> {
    if !directory.is_dir() {
        fs::create_dir_all(directory)?;
    }
    Ok(directory.join(name))
}

/// Write encoded photo bytes to the given path, overwriting any existing
/// file. No atomic rename; partial writes are left in place on error.
pub fn write_photo(path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::write(path, bytes)
}
