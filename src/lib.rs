//! psp_tagger - Batch-tag MP4 videos for PSP playback
//!
//! This library applies descriptive metadata and `.THM` thumbnail sidecars
//! to every MP4 file in a directory so the PSP XMB displays them correctly,
//! handling both movies and TV show episodes.

mod cover_art;
mod episode_identity;
mod file_resolver;
mod media_tools;
mod metadata;
mod temp;
mod thumbnail;

use media_tools::{FfmpegToolkit, TagWriter, ThumbnailConverter};
use thumbnail::{SHARED_THUMBNAIL_NAME, apply_thumbnail};

// Re-export error types
pub use file_resolver::FileResolverError;
pub use media_tools::{MediaToolError, ffmpeg_available};
pub use metadata::MetadataError;

// Re-export the core decision functions and their types
pub use cover_art::find_cover_image;
pub use episode_identity::{EpisodeIdentity, parse_episode_identity};
pub use file_resolver::{VideoFile, scan_for_videos};
pub use metadata::{ContentKind, MetadataRecord, build_metadata};
pub use thumbnail::{ThumbnailPlan, plan_thumbnail};

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration for one batch run, threaded explicitly through the
/// orchestrator instead of ambient session state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory containing the MP4 files to tag
    pub directory: PathBuf,
    /// Whether the directory holds movies or episodes of one TV show
    pub content: ContentKind,
    /// Keep the cover image and shared thumbnail after the run instead of
    /// removing them for PSP XMB compatibility
    pub keep_images: bool,
}

/// Progress event emitted during a batch run
///
/// These events allow library users to track progress and provide feedback;
/// the library itself never prints.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Batch run started
    Started {
        directory: PathBuf,
        content: ContentKind,
    },

    /// A cover image was located in the directory
    CoverImageFound { filename: String },

    /// No cover image was located; thumbnails are skipped for this run
    CoverImageMissing,

    /// The cover image was converted into the shared PSP thumbnail
    ThumbnailPrepared { path: PathBuf },

    /// Converting the cover image failed; the run continues without thumbnails
    ThumbnailConversionFailed { detail: String },

    /// MP4 files discovered in the directory
    VideosFound { count: usize },

    /// Processing a specific video file
    ProcessingVideo {
        index: usize,
        total: usize,
        video_path: PathBuf,
    },

    /// An episode identity was detected in the video's filename
    EpisodeDetected {
        video_path: PathBuf,
        episode_id: String,
    },

    /// Metadata was written into the video container
    MetadataWritten { video_path: PathBuf },

    /// The `.THM` sidecar was written next to the video
    ThumbnailWritten { thumbnail_path: PathBuf },

    /// A single file failed; the run continues with the next one
    FileFailed {
        video_path: PathBuf,
        detail: String,
    },

    /// A temporary or cover file was removed during post-run cleanup
    CleanupRemoved { filename: String },

    /// Batch run complete
    Complete { succeeded: usize, failed: usize },
}

/// Outcome of processing one video file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// The video file this outcome belongs to
    pub video_path: PathBuf,
    /// Whether metadata and thumbnail were applied successfully
    pub succeeded: bool,
    /// Failure detail for unsuccessful files
    pub error_detail: Option<String>,
}

/// Per-file outcomes of a completed batch run
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// One outcome per discovered video, in processing order
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    /// Number of files that were fully processed
    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    /// Number of files that failed at some step
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }
}

/// Top-level error type for psp_tagger operations
#[derive(Debug, Error)]
pub enum PspTaggerError {
    /// Error while listing the batch directory
    #[error("File resolution error: {0}")]
    FileResolver(#[from] FileResolverError),

    /// Invalid run configuration
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// External media tool missing or failing before any file was touched
    #[error("Media tool error: {0}")]
    MediaTool(#[from] MediaToolError),

    /// The directory contains no MP4 files
    #[error("No MP4 files found in {0}")]
    NoVideoFiles(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Tags every MP4 file in the configured directory.
///
/// The run locates a cover image, converts it once into the shared 160x120
/// PSP thumbnail, then processes each video in directory-listing order:
/// episode identity parsing (TV mode), metadata write, `.THM` sidecar write.
/// A failing file is recorded and skipped; it never halts the run. Unless
/// configured otherwise, the cover image and the shared thumbnail are
/// removed afterwards so the PSP XMB does not display them as stray media.
///
/// Progress events are emitted through the provided callback, allowing
/// library users to track progress, display status, or remain silent.
///
/// # Errors
///
/// Fails fatally, before touching any file, when ffmpeg is unavailable,
/// when the directory cannot be listed or holds no MP4 files, or when TV
/// mode is configured with an empty show name. Per-file failures are not
/// errors; they are reported in the returned [`BatchSummary`].
///
/// # Examples
///
/// ```no_run
/// use psp_tagger::{ContentKind, ProgressEvent, RunConfig, run_batch};
/// use std::path::PathBuf;
///
/// let config = RunConfig {
///     directory: PathBuf::from("/media/shows/firefly"),
///     content: ContentKind::TvShow {
///         show_name: "Firefly".to_string(),
///     },
///     keep_images: false,
/// };
///
/// let summary = run_batch(&config, |event| {
///     if let ProgressEvent::FileFailed { video_path, detail } = event {
///         eprintln!("{}: {}", video_path.display(), detail);
///     }
/// })
/// .unwrap();
///
/// println!("{} tagged, {} failed", summary.succeeded_count(), summary.failed_count());
/// ```
pub fn run_batch<F>(config: &RunConfig, progress_callback: F) -> Result<BatchSummary, PspTaggerError>
where
    F: FnMut(ProgressEvent),
{
    if !media_tools::ffmpeg_available() {
        return Err(MediaToolError::FfmpegMissing.into());
    }

    let toolkit = FfmpegToolkit::new();
    run_batch_with_tools(config, &toolkit, &toolkit, progress_callback)
}

/// Batch implementation over injected collaborators, shared by `run_batch`
/// and the tests.
fn run_batch_with_tools<W, C, F>(
    config: &RunConfig,
    tag_writer: &W,
    converter: &C,
    mut progress_callback: F,
) -> Result<BatchSummary, PspTaggerError>
where
    W: TagWriter,
    C: ThumbnailConverter,
    F: FnMut(ProgressEvent),
{
    // Fatal input validation happens before any file is touched.
    if let ContentKind::TvShow { show_name } = &config.content {
        if show_name.trim().is_empty() {
            return Err(MetadataError::EmptyShowName.into());
        }
    }

    progress_callback(ProgressEvent::Started {
        directory: config.directory.clone(),
        content: config.content.clone(),
    });

    // One listing feeds both the video set and the cover candidate set.
    let names = file_resolver::list_file_names(&config.directory)?;
    let videos = file_resolver::videos_from_listing(&config.directory, &names);
    if videos.is_empty() {
        return Err(PspTaggerError::NoVideoFiles(config.directory.clone()));
    }

    let shared_thumbnail = prepare_shared_thumbnail(config, &names, converter, &mut progress_callback);

    progress_callback(ProgressEvent::VideosFound {
        count: videos.len(),
    });

    let mut outcomes = Vec::with_capacity(videos.len());
    for (index, video) in videos.iter().enumerate() {
        progress_callback(ProgressEvent::ProcessingVideo {
            index,
            total: videos.len(),
            video_path: video.path.clone(),
        });

        match process_video(
            &config.content,
            video,
            shared_thumbnail.as_deref(),
            tag_writer,
            &mut progress_callback,
        ) {
            Ok(()) => outcomes.push(FileOutcome {
                video_path: video.path.clone(),
                succeeded: true,
                error_detail: None,
            }),
            Err(detail) => {
                progress_callback(ProgressEvent::FileFailed {
                    video_path: video.path.clone(),
                    detail: detail.clone(),
                });
                outcomes.push(FileOutcome {
                    video_path: video.path.clone(),
                    succeeded: false,
                    error_detail: Some(detail),
                });
            }
        }
    }

    if !config.keep_images {
        cleanup_images(&config.directory, &names, &mut progress_callback);
    }

    let summary = BatchSummary { outcomes };
    progress_callback(ProgressEvent::Complete {
        succeeded: summary.succeeded_count(),
        failed: summary.failed_count(),
    });

    Ok(summary)
}

/// Locates the cover image and converts it once into the shared thumbnail.
///
/// Returns the shared thumbnail path, or `None` when no cover exists or the
/// conversion failed; either way the run continues without thumbnails.
fn prepare_shared_thumbnail<C, F>(
    config: &RunConfig,
    names: &[String],
    converter: &C,
    progress_callback: &mut F,
) -> Option<PathBuf>
where
    C: ThumbnailConverter,
    F: FnMut(ProgressEvent),
{
    let Some(cover_name) = cover_art::find_cover_image(names) else {
        progress_callback(ProgressEvent::CoverImageMissing);
        return None;
    };

    progress_callback(ProgressEvent::CoverImageFound {
        filename: cover_name.to_string(),
    });

    let cover_path = config.directory.join(cover_name);
    let shared_path = config.directory.join(SHARED_THUMBNAIL_NAME);

    match converter.convert_to_thumbnail(&cover_path, &shared_path) {
        Ok(()) => {
            progress_callback(ProgressEvent::ThumbnailPrepared {
                path: shared_path.clone(),
            });
            Some(shared_path)
        }
        Err(e) => {
            progress_callback(ProgressEvent::ThumbnailConversionFailed {
                detail: e.to_string(),
            });
            None
        }
    }
}

/// Runs the per-file pipeline: identity parsing, metadata write, thumbnail
/// write. Returns the failure detail of the first failing step.
fn process_video<W, F>(
    content: &ContentKind,
    video: &VideoFile,
    shared_thumbnail: Option<&Path>,
    tag_writer: &W,
    progress_callback: &mut F,
) -> Result<(), String>
where
    W: TagWriter,
    F: FnMut(ProgressEvent),
{
    let stem = video.stem();

    // Episode identities only make sense for TV content.
    let identity = match content {
        ContentKind::TvShow { .. } => parse_episode_identity(&stem),
        ContentKind::Movie => None,
    };
    if let Some(identity) = identity {
        progress_callback(ProgressEvent::EpisodeDetected {
            video_path: video.path.clone(),
            episode_id: identity.to_string(),
        });
    }

    let record = build_metadata(content, &stem, identity).map_err(|e| e.to_string())?;

    tag_writer
        .write_metadata(&video.path, &record)
        .map_err(|e| format!("Failed to write metadata: {e}"))?;
    progress_callback(ProgressEvent::MetadataWritten {
        video_path: video.path.clone(),
    });

    if let Some(plan) = plan_thumbnail(&video.path, shared_thumbnail) {
        apply_thumbnail(&plan).map_err(|e| format!("Failed to write thumbnail: {e}"))?;
        progress_callback(ProgressEvent::ThumbnailWritten {
            thumbnail_path: plan.target,
        });
    }

    Ok(())
}

/// Removes the shared thumbnail and every cover candidate from the
/// directory. The PSP XMB lists stray images next to the videos, so a
/// default run leaves none behind. Removal errors are ignored.
fn cleanup_images<F>(directory: &Path, names: &[String], progress_callback: &mut F)
where
    F: FnMut(ProgressEvent),
{
    let mut targets: Vec<&str> = vec![SHARED_THUMBNAIL_NAME];
    targets.extend(
        names
            .iter()
            .map(String::as_str)
            .filter(|name| cover_art::is_cover_candidate(name)),
    );

    for name in targets {
        let path = directory.join(name);
        if path.exists() && std::fs::remove_file(&path).is_ok() {
            progress_callback(ProgressEvent::CleanupRemoved {
                filename: name.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs::{self, File};

    /// Tag writer that records every metadata record instead of touching
    /// the container. Optionally fails on one filename.
    struct FakeTagWriter {
        written: RefCell<Vec<(PathBuf, MetadataRecord)>>,
        fail_on: Option<String>,
    }

    impl FakeTagWriter {
        fn new() -> Self {
            Self {
                written: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(filename: &str) -> Self {
            Self {
                written: RefCell::new(Vec::new()),
                fail_on: Some(filename.to_string()),
            }
        }
    }

    impl TagWriter for FakeTagWriter {
        fn write_metadata(
            &self,
            video_path: &Path,
            record: &MetadataRecord,
        ) -> Result<(), MediaToolError> {
            let name = video_path.file_name().unwrap().to_string_lossy();
            if self.fail_on.as_deref() == Some(name.as_ref()) {
                return Err(MediaToolError::CommandFailed {
                    path: video_path.to_path_buf(),
                    detail: "injected failure".to_string(),
                });
            }
            self.written
                .borrow_mut()
                .push((video_path.to_path_buf(), record.clone()));
            Ok(())
        }
    }

    /// Converter that writes a fixed payload instead of running ffmpeg.
    struct FakeConverter {
        payload: &'static [u8],
    }

    impl ThumbnailConverter for FakeConverter {
        fn convert_to_thumbnail(
            &self,
            _source_path: &Path,
            target_path: &Path,
        ) -> Result<(), MediaToolError> {
            fs::write(target_path, self.payload)?;
            Ok(())
        }
    }

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("batch_test_{}", ulid::Ulid::new()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn tv_config(dir: &Path, keep_images: bool) -> RunConfig {
        RunConfig {
            directory: dir.to_path_buf(),
            content: ContentKind::TvShow {
                show_name: "Firefly".to_string(),
            },
            keep_images,
        }
    }

    #[test]
    fn test_failing_file_does_not_halt_the_run() {
        let dir = scratch_dir();
        for name in ["ep1.mp4", "ep2.mp4", "ep3.mp4", "ep4.mp4", "ep5.mp4"] {
            File::create(dir.join(name)).unwrap();
        }
        File::create(dir.join("cover.jpg")).unwrap();

        let writer = FakeTagWriter::failing_on("ep3.mp4");
        let converter = FakeConverter { payload: b"thumb" };
        let summary =
            run_batch_with_tools(&tv_config(&dir, true), &writer, &converter, |_| {}).unwrap();

        assert_eq!(summary.outcomes.len(), 5);
        assert_eq!(summary.succeeded_count(), 4);
        assert_eq!(summary.failed_count(), 1);

        let failed: Vec<_> = summary.outcomes.iter().filter(|o| !o.succeeded).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].video_path.ends_with("ep3.mp4"));
        assert!(failed[0].error_detail.as_deref().unwrap().contains("injected failure"));

        // Every file after the failing one was still attempted.
        assert_eq!(writer.written.borrow().len(), 4);
        assert!(dir.join("ep4.THM").exists());
        assert!(dir.join("ep5.THM").exists());
        assert!(!dir.join("ep3.THM").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_movie_run_tags_and_writes_thumbnails() {
        let dir = scratch_dir();
        File::create(dir.join("Heat.mp4")).unwrap();
        File::create(dir.join("Cover.JPG")).unwrap();

        let config = RunConfig {
            directory: dir.clone(),
            content: ContentKind::Movie,
            keep_images: true,
        };
        let writer = FakeTagWriter::new();
        let converter = FakeConverter { payload: b"jpeg" };
        let summary = run_batch_with_tools(&config, &writer, &converter, |_| {}).unwrap();

        assert_eq!(summary.succeeded_count(), 1);
        let written = writer.written.borrow();
        assert_eq!(written[0].1.title, "Heat");
        assert_eq!(written[0].1.album, "Movies");
        assert_eq!(written[0].1.show, None);
        assert_eq!(written[0].1.episode_id, None);
        assert_eq!(fs::read(dir.join("Heat.THM")).unwrap(), b"jpeg");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_tv_run_attaches_episode_ids() {
        let dir = scratch_dir();
        File::create(dir.join("1x01 - Serenity.mp4")).unwrap();
        File::create(dir.join("Gag Reel.mp4")).unwrap();

        let writer = FakeTagWriter::new();
        let converter = FakeConverter { payload: b"jpeg" };
        let mut events = Vec::new();
        run_batch_with_tools(&tv_config(&dir, true), &writer, &converter, |event| {
            events.push(event)
        })
        .unwrap();

        let written = writer.written.borrow();
        let serenity = written
            .iter()
            .find(|(path, _)| path.ends_with("1x01 - Serenity.mp4"))
            .unwrap();
        assert_eq!(serenity.1.episode_id.as_deref(), Some("S01E01"));
        assert_eq!(serenity.1.album, "Firefly");

        let gag_reel = written
            .iter()
            .find(|(path, _)| path.ends_with("Gag Reel.mp4"))
            .unwrap();
        assert_eq!(gag_reel.1.episode_id, None);

        let detected: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::EpisodeDetected { episode_id, .. } => Some(episode_id.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(detected, vec!["S01E01".to_string()]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_cover_skips_thumbnails() {
        let dir = scratch_dir();
        File::create(dir.join("ep1.mp4")).unwrap();

        let writer = FakeTagWriter::new();
        let converter = FakeConverter { payload: b"jpeg" };
        let mut saw_missing = false;
        let summary = run_batch_with_tools(&tv_config(&dir, true), &writer, &converter, |event| {
            if matches!(event, ProgressEvent::CoverImageMissing) {
                saw_missing = true;
            }
        })
        .unwrap();

        assert!(saw_missing);
        assert_eq!(summary.succeeded_count(), 1);
        assert!(!dir.join("ep1.THM").exists());
        assert!(!dir.join("thumbnail.jpg").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_no_videos_is_fatal() {
        let dir = scratch_dir();
        File::create(dir.join("cover.jpg")).unwrap();

        let writer = FakeTagWriter::new();
        let converter = FakeConverter { payload: b"jpeg" };
        let result = run_batch_with_tools(&tv_config(&dir, true), &writer, &converter, |_| {});
        assert!(matches!(result, Err(PspTaggerError::NoVideoFiles(_))));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_show_name_is_fatal_before_processing() {
        let dir = scratch_dir();
        File::create(dir.join("ep1.mp4")).unwrap();

        let config = RunConfig {
            directory: dir.clone(),
            content: ContentKind::TvShow {
                show_name: "  ".to_string(),
            },
            keep_images: true,
        };
        let writer = FakeTagWriter::new();
        let converter = FakeConverter { payload: b"jpeg" };
        let result = run_batch_with_tools(&config, &writer, &converter, |_| {});

        assert!(matches!(
            result,
            Err(PspTaggerError::Metadata(MetadataError::EmptyShowName))
        ));
        assert!(writer.written.borrow().is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_rerun_produces_identical_records_and_thumbnails() {
        let dir = scratch_dir();
        File::create(dir.join("S01E01 - Pilot.mp4")).unwrap();
        File::create(dir.join("cover.png")).unwrap();

        let converter = FakeConverter { payload: b"jpeg" };

        let writer1 = FakeTagWriter::new();
        run_batch_with_tools(&tv_config(&dir, true), &writer1, &converter, |_| {}).unwrap();
        let thm1 = fs::read(dir.join("S01E01 - Pilot.THM")).unwrap();

        let writer2 = FakeTagWriter::new();
        run_batch_with_tools(&tv_config(&dir, true), &writer2, &converter, |_| {}).unwrap();
        let thm2 = fs::read(dir.join("S01E01 - Pilot.THM")).unwrap();

        assert_eq!(*writer1.written.borrow(), *writer2.written.borrow());
        assert_eq!(thm1, thm2);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_cleanup_removes_cover_and_shared_thumbnail() {
        let dir = scratch_dir();
        File::create(dir.join("ep1.mp4")).unwrap();
        File::create(dir.join("cover.jpg")).unwrap();

        let writer = FakeTagWriter::new();
        let converter = FakeConverter { payload: b"jpeg" };
        let mut removed = Vec::new();
        run_batch_with_tools(&tv_config(&dir, false), &writer, &converter, |event| {
            if let ProgressEvent::CleanupRemoved { filename } = event {
                removed.push(filename);
            }
        })
        .unwrap();

        assert!(!dir.join("cover.jpg").exists());
        assert!(!dir.join("thumbnail.jpg").exists());
        // The sidecar written before cleanup survives it.
        assert!(dir.join("ep1.THM").exists());
        assert_eq!(removed.len(), 2);

        fs::remove_dir_all(&dir).ok();
    }
}
