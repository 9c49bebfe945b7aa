//! Thumbnail planning
//!
//! The PSP shows a video's preview image from a sidecar `.THM` file, a
//! 160x120 JPEG sharing the video's stem. The cover image is converted once
//! per run into a shared intermediate; this module maps each video to its
//! `.THM` target and copies the shared intermediate into place. Pixel work
//! is delegated to [`crate::media_tools`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the shared intermediate thumbnail written next to the videos.
pub const SHARED_THUMBNAIL_NAME: &str = "thumbnail.jpg";

/// Thumbnail dimensions the PSP XMB expects.
pub const THUMBNAIL_WIDTH: u32 = 160;
pub const THUMBNAIL_HEIGHT: u32 = 120;

/// Source and target of one video's thumbnail write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailPlan {
    /// The shared intermediate thumbnail produced from the cover image
    pub source: PathBuf,
    /// Sidecar `.THM` path next to the video
    pub target: PathBuf,
}

/// Maps a video file to its thumbnail plan.
///
/// The target is the video path with its extension replaced by uppercase
/// `THM` regardless of the video extension's case. Returns `None` when the
/// run has no shared thumbnail; no thumbnail is ever fabricated.
pub fn plan_thumbnail(video_path: &Path, shared_thumbnail: Option<&Path>) -> Option<ThumbnailPlan> {
    let source = shared_thumbnail?;
    Some(ThumbnailPlan {
        source: source.to_path_buf(),
        target: video_path.with_extension("THM"),
    })
}

/// Writes the planned `.THM` file by copying the shared thumbnail bytes,
/// overwriting any existing sidecar.
pub fn apply_thumbnail(plan: &ThumbnailPlan) -> io::Result<()> {
    fs::copy(&plan.source, &plan.target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_replaces_extension_with_uppercase_thm() {
        let shared = PathBuf::from("/videos/thumbnail.jpg");
        let plan = plan_thumbnail(Path::new("/videos/ep1.mp4"), Some(&shared)).unwrap();
        assert_eq!(plan.target, PathBuf::from("/videos/ep1.THM"));
        assert_eq!(plan.source, shared);

        let plan = plan_thumbnail(Path::new("/videos/ep2.MP4"), Some(&shared)).unwrap();
        assert_eq!(plan.target, PathBuf::from("/videos/ep2.THM"));
    }

    #[test]
    fn test_plan_skips_without_shared_thumbnail() {
        assert_eq!(plan_thumbnail(Path::new("/videos/ep1.mp4"), None), None);
    }

    #[test]
    fn test_apply_thumbnail_copies_and_overwrites() {
        let dir = std::env::temp_dir().join(format!("thm_test_{}", ulid::Ulid::new()));
        fs::create_dir_all(&dir).unwrap();

        let source = dir.join(SHARED_THUMBNAIL_NAME);
        fs::write(&source, b"jpeg bytes").unwrap();
        let target = dir.join("ep1.THM");
        fs::write(&target, b"stale").unwrap();

        let plan = ThumbnailPlan {
            source: source.clone(),
            target: target.clone(),
        };
        apply_thumbnail(&plan).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"jpeg bytes");

        fs::remove_dir_all(&dir).ok();
    }
}
