//! External media tool collaborators
//!
//! Metadata writing and image conversion are performed by an external tool
//! (ffmpeg). The orchestrator only talks to the narrow traits defined here,
//! so the batch logic stays testable without the real tool present; the
//! ffmpeg-backed implementations live in the `ffmpeg` submodule.

mod ffmpeg;

pub use ffmpeg::{FfmpegToolkit, ffmpeg_available};

use crate::metadata::MetadataRecord;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while invoking an external media tool
#[derive(Debug, Error)]
pub enum MediaToolError {
    /// ffmpeg is missing; fatal for the whole run
    #[error("ffmpeg is not installed or not available in PATH")]
    FfmpegMissing,

    /// The tool could not be launched
    #[error("Failed to launch ffmpeg: {0}")]
    Launch(String),

    /// The tool ran but reported failure
    #[error("ffmpeg failed on {path}: {detail}")]
    CommandFailed { path: PathBuf, detail: String },

    /// IO error while staging or swapping files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Writes a finalized metadata record into a video container, in place.
pub trait TagWriter {
    /// Applies every tag pair of `record` to the video at `video_path`.
    ///
    /// The container is rewritten in place; on failure the original file is
    /// left untouched.
    fn write_metadata(&self, video_path: &Path, record: &MetadataRecord)
    -> Result<(), MediaToolError>;
}

/// Converts a source image into the PSP's fixed-size JPEG thumbnail format.
pub trait ThumbnailConverter {
    /// Converts the image at `source_path` into a 160x120 JPEG at
    /// `target_path`, overwriting an existing file.
    fn convert_to_thumbnail(
        &self,
        source_path: &Path,
        target_path: &Path,
    ) -> Result<(), MediaToolError>;
}
