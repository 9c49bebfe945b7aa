//! Metadata record construction
//!
//! Builds the finalized set of tag fields for one video file, ready to hand
//! to the external tag writer. Pure decision logic; the actual container
//! mutation lives in [`crate::media_tools`].

use crate::episode_identity::EpisodeIdentity;
use thiserror::Error;

/// Album name applied to every movie.
const MOVIE_ALBUM: &str = "Movies";

/// Errors that can occur while building a metadata record
#[derive(Debug, Error)]
pub enum MetadataError {
    /// TV show mode requires a non-empty show name
    #[error("TV show name must not be empty")]
    EmptyShowName,
}

/// Content type the user selected for the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// Standalone movies; tagged with a fixed "Movies" album
    Movie,
    /// Episodes of a single TV show; tagged with the show's name
    TvShow {
        /// Name of the show, must be non-empty
        show_name: String,
    },
}

/// Finalized tag fields for one video file.
///
/// Built fresh per file, never mutated afterwards, and consumed exactly once
/// by the tag writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Video title; the filename stem, untransformed
    pub title: String,
    /// Album grouping shown by the PSP XMB
    pub album: String,
    /// Show name, TV content only
    pub show: Option<String>,
    /// Canonical episode identifier (e.g. `S01E01`), TV content with a
    /// detected identity only
    pub episode_id: Option<String>,
}

impl MetadataRecord {
    /// Tag key/value pairs in the order they are written to the container.
    pub fn tag_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("title", self.title.as_str()), ("album", self.album.as_str())];
        if let Some(show) = &self.show {
            pairs.push(("show", show.as_str()));
        }
        if let Some(episode_id) = &self.episode_id {
            pairs.push(("episode_id", episode_id.as_str()));
        }
        pairs
    }
}

/// Builds the metadata record for a single video file.
///
/// * Movies are titled after the filename stem and grouped under a fixed
///   "Movies" album.
/// * TV episodes carry the show name as both album and show tag, plus the
///   canonical episode identifier when one was detected. An absent identity
///   simply omits the tag; it is never synthesized.
///
/// # Errors
///
/// Returns [`MetadataError::EmptyShowName`] when TV content is built with a
/// blank show name; there is no silent fallback to a default name.
pub fn build_metadata(
    content: &ContentKind,
    video_stem: &str,
    identity: Option<EpisodeIdentity>,
) -> Result<MetadataRecord, MetadataError> {
    match content {
        ContentKind::Movie => Ok(MetadataRecord {
            title: video_stem.to_string(),
            album: MOVIE_ALBUM.to_string(),
            show: None,
            episode_id: None,
        }),
        ContentKind::TvShow { show_name } => {
            if show_name.trim().is_empty() {
                return Err(MetadataError::EmptyShowName);
            }
            Ok(MetadataRecord {
                title: video_stem.to_string(),
                album: show_name.clone(),
                show: Some(show_name.clone()),
                episode_id: identity.map(|identity| identity.to_string()),
            })
        }
    }
}
