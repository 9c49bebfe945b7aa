//! Directory listing and video discovery
//!
//! Lists a single directory level in listing order and filters the MP4
//! files out of it. The same listing feeds both the video set and the cover
//! image candidate set, so one run sees one consistent snapshot.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while listing a directory
#[derive(Debug, Error)]
pub enum FileResolverError {
    /// Path is not a directory
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Failed to read directory
    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to read directory entry
    #[error("Failed to read directory entry: {0}")]
    ReadEntryFailed(#[from] io::Error),
}

/// A video file discovered in the batch directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    /// Path to the video file
    pub path: PathBuf,
}

impl VideoFile {
    /// Filename stem without the extension, used as the tag title and fed
    /// to the episode identity parser.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Lists the regular files of a directory in listing order.
///
/// Non-recursive; subdirectories and hidden files are skipped. The returned
/// names are bare filenames, not paths.
pub fn list_file_names(dir_path: &Path) -> Result<Vec<String>, FileResolverError> {
    if !dir_path.is_dir() {
        return Err(FileResolverError::NotADirectory(dir_path.to_path_buf()));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir_path).map_err(|e| FileResolverError::ReadDirectoryFailed {
        path: dir_path.to_path_buf(),
        source: e,
    })? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }

    Ok(names)
}

/// Discovers the MP4 files of a directory, in listing order.
pub fn scan_for_videos(dir_path: &Path) -> Result<Vec<VideoFile>, FileResolverError> {
    let names = list_file_names(dir_path)?;
    Ok(videos_from_listing(dir_path, &names))
}

/// Filters a directory listing down to MP4 video files.
pub(crate) fn videos_from_listing<S: AsRef<str>>(dir_path: &Path, names: &[S]) -> Vec<VideoFile> {
    names
        .iter()
        .filter(|name| is_mp4(name.as_ref()))
        .map(|name| VideoFile {
            path: dir_path.join(name.as_ref()),
        })
        .collect()
}

/// Returns true for filenames with an `.mp4` extension, case-insensitively.
/// The PSP only plays this container, so no other format qualifies.
fn is_mp4(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(base, ext)| !base.is_empty() && ext.eq_ignore_ascii_case("mp4"))
}
