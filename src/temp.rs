//! Temporary file management module
//!
//! This module provides RAII-based temporary file handling with automatic cleanup.

use std::fs::{self, File};
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Guard for temporary resources that automatically cleans up on drop
#[derive(Debug)]
pub(crate) enum TempGuard {
    /// Temporary file that will be deleted when dropped
    File(PathBuf),
}

impl TempGuard {
    /// Get the path to the temporary resource
    pub(crate) fn path(&self) -> &Path {
        match self {
            TempGuard::File(path) => path,
        }
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        match self {
            TempGuard::File(path) => {
                // Silently ignore errors during cleanup
                let _ = fs::remove_file(path);
            }
        }
    }
}

impl Deref for TempGuard {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.path()
    }
}

/// Creates a temporary file next to an existing file, keeping the original's
/// extension so tools that infer a format from it keep working.
///
/// In-place rewrites go through this sibling: write the new content here,
/// then rename it over the original. The sibling lives in the same directory
/// so the final rename never crosses filesystems. The name carries a ULID
/// (monotonic, sortable unique identifier) to avoid collisions, and the file
/// is deleted again when the returned `TempGuard` is dropped.
pub(crate) fn create_sibling_temp(original: &Path) -> io::Result<TempGuard> {
    let directory = original.parent().unwrap_or_else(|| Path::new("."));
    let stem = original
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rewrite".to_string());

    let ulid = ulid::Ulid::new();
    let filename = match original.extension() {
        Some(extension) => format!("{}.{}.{}", stem, ulid, extension.to_string_lossy()),
        None => format!("{}.{}", stem, ulid),
    };

    let path = directory.join(filename);

    // Create the file
    File::create(&path)?;

    Ok(TempGuard::File(path))
}
