//! ffmpeg-backed implementations of the media tool traits

use super::{MediaToolError, TagWriter, ThumbnailConverter};
use crate::metadata::MetadataRecord;
use crate::temp::create_sibling_temp;
use crate::thumbnail::{THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH};
use ffmpeg_sidecar::command::{FfmpegCommand, ffmpeg_is_installed};
use std::fs;
use std::path::Path;

/// Returns true when an ffmpeg binary is reachable on the PATH.
pub fn ffmpeg_available() -> bool {
    ffmpeg_is_installed()
}

/// Media toolkit backed by the system ffmpeg binary
#[derive(Debug, Default)]
pub struct FfmpegToolkit;

impl FfmpegToolkit {
    pub fn new() -> Self {
        Self
    }
}

impl TagWriter for FfmpegToolkit {
    /// Remuxes the video with `-c copy` plus one `-metadata` flag per tag
    /// pair, writing to a sibling temp file and renaming it over the
    /// original on success. The temp file is removed again if anything
    /// fails along the way.
    fn write_metadata(
        &self,
        video_path: &Path,
        record: &MetadataRecord,
    ) -> Result<(), MediaToolError> {
        let temp_output = create_sibling_temp(video_path)?;

        let mut command = FfmpegCommand::new();
        command
            .input(video_path.to_string_lossy())
            .args(["-c", "copy"]);
        for (key, value) in record.tag_pairs() {
            command.args(["-metadata", &format!("{key}={value}")]);
        }
        command
            .overwrite()
            .output(temp_output.to_string_lossy());

        run_to_completion(command, video_path)?;

        fs::rename(temp_output.path(), video_path)?;
        Ok(())
    }
}

impl ThumbnailConverter for FfmpegToolkit {
    /// Scales the source image to 160x120 and encodes a single high-quality
    /// JPEG frame, overwriting the target.
    fn convert_to_thumbnail(
        &self,
        source_path: &Path,
        target_path: &Path,
    ) -> Result<(), MediaToolError> {
        let mut command = FfmpegCommand::new();
        command
            .input(source_path.to_string_lossy())
            .args([
                "-vf",
                &format!("scale={THUMBNAIL_WIDTH}:{THUMBNAIL_HEIGHT}"),
                "-frames:v",
                "1",
                "-q:v",
                "2",
            ])
            .overwrite()
            .output(target_path.to_string_lossy());

        run_to_completion(command, source_path)
    }
}

/// Spawns the prepared command, waits for it, and maps a non-zero exit into
/// a `CommandFailed` naming the file being processed.
fn run_to_completion(mut command: FfmpegCommand, subject: &Path) -> Result<(), MediaToolError> {
    let mut child = command
        .spawn()
        .map_err(|e| MediaToolError::Launch(e.to_string()))?;

    let status = child
        .wait()
        .map_err(|e| MediaToolError::Launch(e.to_string()))?;

    if !status.success() {
        return Err(MediaToolError::CommandFailed {
            path: subject.to_path_buf(),
            detail: format!("exited with {status}"),
        });
    }

    Ok(())
}
