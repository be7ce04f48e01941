//! Filesystem helpers for the builder.

use std::fs;
use std::io;
use std::path::Path;

/// Delete a directory tree if it exists, then recreate it empty,
/// creating any missing parents. Absence is not an error.
pub fn recreate_dir(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    fs::create_dir_all(path)
}
