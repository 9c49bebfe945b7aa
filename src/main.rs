use clap::Parser;
use dialoguer::{Input, Select};
use psp_tagger::{
    ContentKind, MediaToolError, ProgressEvent, PspTaggerError, RunConfig, ffmpeg_available,
    run_batch, scan_for_videos,
};
use std::path::{Path, PathBuf};
use std::process;

/// Batch-write MP4 metadata and .THM thumbnails for PSP playback
#[derive(Debug, Parser)]
#[command(name = "psp_tagger", version)]
struct Cli {
    /// Directory containing the MP4 files to tag (prompted for when omitted)
    #[arg(long)]
    directory: Option<PathBuf>,

    /// Tag the files as movies
    #[arg(long, conflicts_with = "show_name")]
    movie: bool,

    /// Tag the files as episodes of this TV show
    #[arg(long)]
    show_name: Option<String>,

    /// Keep the cover image and intermediate thumbnail after the run
    #[arg(long)]
    keep_images: bool,
}

/// Handles progress events and prints formatted output to stdout
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::Started { directory, content } => match content {
            ContentKind::Movie => {
                println!("\nProcessing movies in: {}", directory.display());
            }
            ContentKind::TvShow { show_name } => {
                println!(
                    "\nProcessing TV show '{}' in: {}",
                    show_name,
                    directory.display()
                );
            }
        },
        ProgressEvent::CoverImageFound { filename } => {
            println!("✓ Found cover image: {filename}");
        }
        ProgressEvent::CoverImageMissing => {
            println!("No cover image found");
        }
        ProgressEvent::ThumbnailPrepared { .. } => {
            println!("✓ Cover image converted to PSP thumbnail");
        }
        ProgressEvent::ThumbnailConversionFailed { detail } => {
            println!("✗ Failed to convert cover image: {detail}");
        }
        ProgressEvent::VideosFound { count } => {
            println!("Found {count} MP4 file(s)");
        }
        ProgressEvent::ProcessingVideo {
            index,
            total,
            video_path,
        } => {
            println!("\n[{}/{}] Processing: {}", index + 1, total, video_path.display());
        }
        ProgressEvent::EpisodeDetected { episode_id, .. } => {
            println!("  Episode: {episode_id}");
        }
        ProgressEvent::MetadataWritten { .. } => {
            println!("  ✓ Metadata added");
        }
        ProgressEvent::ThumbnailWritten { .. } => {
            println!("  ✓ PSP thumbnail created");
        }
        ProgressEvent::FileFailed { detail, .. } => {
            println!("  ✗ {detail}");
        }
        ProgressEvent::CleanupRemoved { filename } => {
            println!("✓ Removed: {filename}");
        }
        ProgressEvent::Complete { succeeded, failed } => {
            println!("\nTagged {succeeded} video(s), {failed} failed.");
        }
    }
}

/// Expands a leading `~` to the user's home directory, like a shell would.
fn expand_tilde(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') {
            if let Some(user_dirs) = directories::UserDirs::new() {
                return user_dirs.home_dir().join(rest.trim_start_matches('/'));
            }
        }
    }
    PathBuf::from(input)
}

/// Checks that the path is a directory holding at least one MP4 file.
/// Returns the MP4 count, or a message suitable for re-prompting.
fn validate_directory(path: &Path) -> Result<usize, String> {
    if !path.exists() {
        return Err(format!("Directory '{}' does not exist.", path.display()));
    }
    if !path.is_dir() {
        return Err(format!("'{}' is not a directory.", path.display()));
    }
    let videos =
        scan_for_videos(path).map_err(|e| format!("Cannot read '{}': {e}", path.display()))?;
    if videos.is_empty() {
        return Err(format!("No MP4 files found in '{}'.", path.display()));
    }
    Ok(videos.len())
}

fn prompt_text(prompt: &str) -> String {
    match Input::<String>::new().with_prompt(prompt).interact_text() {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Failed to read input: {e}");
            process::exit(1);
        }
    }
}

fn prompt_directory() -> PathBuf {
    loop {
        let input = prompt_text("Enter the directory containing the video files");
        let trimmed = input.trim();
        if trimmed.is_empty() {
            println!("Please enter a valid directory path.");
            continue;
        }

        let path = expand_tilde(trimmed);
        match validate_directory(&path) {
            Ok(count) => {
                println!("✓ Found {} MP4 file(s) in '{}'", count, path.display());
                return path;
            }
            Err(message) => println!("{message}"),
        }
    }
}

fn prompt_content_kind() -> ContentKind {
    let selection = Select::new()
        .with_prompt("Is the content a movie or a TV show?")
        .items(&["Movie", "TV show"])
        .default(0)
        .interact();

    match selection {
        Ok(0) => ContentKind::Movie,
        Ok(_) => ContentKind::TvShow {
            show_name: prompt_show_name(),
        },
        Err(e) => {
            eprintln!("Failed to read input: {e}");
            process::exit(1);
        }
    }
}

fn prompt_show_name() -> String {
    loop {
        let name = prompt_text("Enter the TV show name");
        let trimmed = name.trim();
        if trimmed.is_empty() {
            println!("Please enter a valid TV show name.");
            continue;
        }
        return trimmed.to_string();
    }
}

fn main() {
    let cli = Cli::parse();

    println!("=== PSP Video Tagger ===");
    println!("This tool will add metadata to your MP4 videos for optimal PSP viewing.\n");

    if !ffmpeg_available() {
        eprintln!("Error: FFmpeg is not installed or not available in PATH.");
        eprintln!("Please install FFmpeg:");
        eprintln!("  macOS: brew install ffmpeg");
        eprintln!("  Linux: sudo apt-get install ffmpeg");
        process::exit(1);
    }

    let directory = match cli.directory {
        Some(directory) => {
            let directory = expand_tilde(&directory.to_string_lossy());
            if let Err(message) = validate_directory(&directory) {
                eprintln!("Error: {message}");
                process::exit(1);
            }
            directory
        }
        None => prompt_directory(),
    };

    let content = if cli.movie {
        ContentKind::Movie
    } else if let Some(show_name) = cli.show_name {
        let show_name = show_name.trim().to_string();
        if show_name.is_empty() {
            eprintln!("Error: TV show name must not be empty.");
            process::exit(1);
        }
        ContentKind::TvShow { show_name }
    } else {
        prompt_content_kind()
    };

    let config = RunConfig {
        directory,
        content,
        keep_images: cli.keep_images,
    };

    match run_batch(&config, handle_progress_event) {
        Ok(summary) => {
            println!("\n=== Processing Complete ===");
            if summary.failed_count() == 0 {
                println!("Your videos are now ready for PSP viewing!");
            } else {
                println!(
                    "{} of {} file(s) tagged; see the failures above.",
                    summary.succeeded_count(),
                    summary.outcomes.len()
                );
            }
        }
        Err(PspTaggerError::MediaTool(MediaToolError::FfmpegMissing)) => {
            eprintln!("Error: FFmpeg is not installed or not available in PATH.");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("\nError: {e}");
            process::exit(1);
        }
    }
}
