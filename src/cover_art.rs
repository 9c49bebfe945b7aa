//! Cover image location
//!
//! A directory may carry a user-supplied cover image (`cover.jpg`,
//! `Cover.png`, ...) that becomes the source for every thumbnail of the run.
//! This module picks at most one such file from a directory listing, purely
//! as a decision with no filesystem access.

/// Recognized cover base name, matched case-insensitively.
const COVER_BASE_NAME: &str = "cover";

/// Recognized cover extensions in preference order, matched case-insensitively.
const COVER_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

/// Chooses the cover image from a directory listing.
///
/// The winner is the filename whose extension sits highest in the preference
/// order; within one extension class the first name in listing order wins.
/// Returns `None` when no filename qualifies.
pub fn find_cover_image<S: AsRef<str>>(names: &[S]) -> Option<&str> {
    for extension in COVER_EXTENSIONS {
        for name in names {
            if matches_cover(name.as_ref(), extension) {
                return Some(name.as_ref());
            }
        }
    }
    None
}

/// Returns true if the filename is a recognized cover image in any extension
/// class. Used by the post-run cleanup to remove cover files the PSP XMB
/// would otherwise choke on.
pub fn is_cover_candidate(name: &str) -> bool {
    COVER_EXTENSIONS
        .iter()
        .any(|extension| matches_cover(name, extension))
}

fn matches_cover(name: &str, extension: &str) -> bool {
    match name.rsplit_once('.') {
        Some((base, ext)) => {
            base.eq_ignore_ascii_case(COVER_BASE_NAME) && ext.eq_ignore_ascii_case(extension)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_prefers_jpg_over_png() {
        let names = ["Cover.JPG", "cover.png"];
        assert_eq!(find_cover_image(&names), Some("Cover.JPG"));
    }

    #[test]
    fn test_locate_is_case_insensitive() {
        let names = ["COVER.GIF"];
        assert_eq!(find_cover_image(&names), Some("COVER.GIF"));
        let names = ["CoVeR.JpEg"];
        assert_eq!(find_cover_image(&names), Some("CoVeR.JpEg"));
    }

    #[test]
    fn test_locate_extension_preference_order() {
        let names = ["cover.gif", "cover.bmp", "cover.png", "cover.jpeg"];
        assert_eq!(find_cover_image(&names), Some("cover.jpeg"));
    }

    #[test]
    fn test_locate_first_in_listing_order_within_class() {
        let names = ["Cover.jpg", "cover.jpg"];
        assert_eq!(find_cover_image(&names), Some("Cover.jpg"));
    }

    #[test]
    fn test_locate_empty_listing() {
        let names: [&str; 0] = [];
        assert_eq!(find_cover_image(&names), None);
    }

    #[test]
    fn test_locate_rejects_other_names_and_extensions() {
        let names = ["poster.jpg", "cover.tiff", "cover", "my_cover.jpg"];
        assert_eq!(find_cover_image(&names), None);
    }

    #[test]
    fn test_is_cover_candidate() {
        assert!(is_cover_candidate("cover.jpg"));
        assert!(is_cover_candidate("COVER.bmp"));
        assert!(!is_cover_candidate("thumbnail.jpg"));
        assert!(!is_cover_candidate("cover.mp4"));
    }
}
