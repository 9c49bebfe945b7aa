//! Episode identity extraction from video filenames
//!
//! Human-chosen episode filenames carry their season/episode numbers in a
//! handful of loosely standardized shapes (`S01E01`, `1x01`, `EP01`,
//! `01 - Title`, `Episode 1`). This module turns a filename stem into a
//! structured [`EpisodeIdentity`] by trying an ordered list of pattern rules
//! and taking the first structural match.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

/// Rule 1: explicit season+episode marker, e.g. `S01E01` or `s1e1`.
///
/// Season and episode are 1-2 digits each; the trailing digit boundary keeps
/// 3+ digit runs like `S01E015` from half-matching.
static SEASON_EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)s(\d{1,2})e(\d{1,2})(?:\D|$)").unwrap());

/// Rule 2: compact season+episode, e.g. `1x01` or `01X1`.
///
/// Digit-bounded on both sides so resolutions like `1920x1080` never match.
static COMPACT_SEASON_EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|\D)(\d{1,2})x(\d{1,2})(?:\D|$)").unwrap());

/// Rule 3: episode marker with implied season 1, e.g. `EP01` or `E7`.
///
/// The marker must not be preceded by a letter, so the trailing `e` of a
/// word like `Episode1` is left for rule 5.
static EPISODE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[^a-z])ep?(\d{1,3})(?:\D|$)").unwrap());

/// Rule 4: bare number at the start of the filename, e.g. `01 - Pilot`.
static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})\s*-").unwrap());

/// Rule 5: spelled-out marker, e.g. `Episode 1` or `Ep 12` (season unknown).
static SPELLED_EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ep(?:isode)?\s*(\d{1,3})(?:\D|$)").unwrap());

/// Season/episode identity extracted from a filename.
///
/// `episode` is always >= 1; `season`, when present, is >= 1 as well. The
/// parser enforces both, so an `EpisodeIdentity` never carries a zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeIdentity {
    /// Season number, absent for episode-only formats like `Episode 1`
    pub season: Option<u32>,
    /// Episode number
    pub episode: u32,
}

impl fmt::Display for EpisodeIdentity {
    /// Canonical rendering: `S01E01` when the season is known, `E01` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.season {
            Some(season) => write!(f, "S{:02}E{:02}", season, self.episode),
            None => write!(f, "E{:02}", self.episode),
        }
    }
}

/// Extracts an episode identity from a filename stem (extension already
/// stripped by the caller).
///
/// The pattern rules are tried in a fixed precedence order and the first
/// structural match wins; the parser never searches for a "best" match.
/// A captured number of `0` invalidates that rule and falls through to the
/// next one. Rules 1-4 yield a known season (rules 3 and 4 assume season 1);
/// rule 5 yields an episode-only identity.
///
/// Returns `None` when no rule matches. That is the designed "no identity"
/// outcome, not an error, and callers must not synthesize a number for it.
pub fn parse_episode_identity(stem: &str) -> Option<EpisodeIdentity> {
    // Rule 1: S01E01
    if let Some(caps) = SEASON_EPISODE_RE.captures(stem) {
        if let (Some(season), Some(episode)) = (nonzero(&caps, 1), nonzero(&caps, 2)) {
            return Some(EpisodeIdentity {
                season: Some(season),
                episode,
            });
        }
    }

    // Rule 2: 1x01
    if let Some(caps) = COMPACT_SEASON_EPISODE_RE.captures(stem) {
        if let (Some(season), Some(episode)) = (nonzero(&caps, 1), nonzero(&caps, 2)) {
            return Some(EpisodeIdentity {
                season: Some(season),
                episode,
            });
        }
    }

    // Rule 3: EP01 / E01, season 1 implied
    if let Some(caps) = EPISODE_MARKER_RE.captures(stem) {
        if let Some(episode) = nonzero(&caps, 1) {
            return Some(EpisodeIdentity {
                season: Some(1),
                episode,
            });
        }
    }

    // Rule 4: leading bare number, season 1 implied
    if let Some(caps) = LEADING_NUMBER_RE.captures(stem) {
        if let Some(episode) = nonzero(&caps, 1) {
            return Some(EpisodeIdentity {
                season: Some(1),
                episode,
            });
        }
    }

    // Rule 5: Episode 1 / Ep 1, season unknown
    if let Some(caps) = SPELLED_EPISODE_RE.captures(stem) {
        if let Some(episode) = nonzero(&caps, 1) {
            return Some(EpisodeIdentity {
                season: None,
                episode,
            });
        }
    }

    None
}

/// Parses a numeric capture, rejecting `0` so it is never promoted to a
/// valid season or episode number.
fn nonzero(caps: &Captures<'_>, index: usize) -> Option<u32> {
    let value: u32 = caps.get(index)?.as_str().parse().ok()?;
    (value > 0).then_some(value)
}
