//! Generated identifiers
//!
//! Deterministic C identifiers derived from asset filenames and unit names.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("valid regex"));

static PNG_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.png$").expect("valid regex"));

// Deliberately loose: matches `.vgm`, `.xgm` and any other `.?gm`
static MUSIC_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\..gm$").expect("valid regex"));

pub const IMAGE_PREFIX: &str = "img_";
pub const MUSIC_PREFIX: &str = "xgm_";
pub const FUNCTION_PREFIX: &str = "VS_";

/// Replace every run of non-word characters with `_`.
///
/// Returns `None` when nothing is left to name.
pub fn sanitize(text: &str) -> Option<String> {
    let sanitized = NON_WORD.replace_all(text, "_");
    (!sanitized.is_empty()).then(|| sanitized.into_owned())
}

/// `img_<stem>` for an image file
pub fn image_identifier(file_name: &str) -> Option<String> {
    let stem = PNG_EXTENSION.replace(file_name.trim(), "");
    sanitize(&stem).map(|s| format!("{}{}", IMAGE_PREFIX, s))
}

/// `xgm_<stem>` for a music file
pub fn music_identifier(file_name: &str) -> Option<String> {
    let stem = MUSIC_EXTENSION.replace(file_name.trim(), "");
    sanitize(&stem).map(|s| format!("{}{}", MUSIC_PREFIX, s))
}

/// Name of the generating function for a source unit
pub fn function_name(unit: &str) -> Option<String> {
    sanitize(unit.trim()).map(|s| format!("{}{}", FUNCTION_PREFIX, s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_identifier() {
        assert_eq!(image_identifier("bg.png").as_deref(), Some("img_bg"));
        assert_eq!(
            image_identifier("  chars/Anna smiling.png ").as_deref(),
            Some("img_chars_Anna_smiling")
        );
        // Only a trailing, lowercase extension is stripped
        assert_eq!(image_identifier("a.png.bak").as_deref(), Some("img_a_png_bak"));
        assert_eq!(image_identifier("A.PNG").as_deref(), Some("img_A_PNG"));
    }

    #[test]
    fn test_music_identifier() {
        assert_eq!(music_identifier("theme.vgm").as_deref(), Some("xgm_theme"));
        assert_eq!(music_identifier("battle.xgm").as_deref(), Some("xgm_battle"));
        assert_eq!(music_identifier("song.mp3").as_deref(), Some("xgm_song_mp3"));
    }

    #[test]
    fn test_degenerate_identifiers() {
        assert_eq!(image_identifier(""), None);
        assert_eq!(image_identifier("   "), None);
        assert_eq!(image_identifier(".png"), None);
        assert_eq!(music_identifier(".vgm"), None);
    }

    #[test]
    fn test_runs_collapse_to_one_underscore() {
        assert_eq!(sanitize("a -- b").as_deref(), Some("a_b"));
        assert_eq!(sanitize("!!!").as_deref(), Some("_"));
        assert_eq!(sanitize("café").as_deref(), Some("caf_"));
    }

    #[test]
    fn test_function_name() {
        assert_eq!(function_name("startup").as_deref(), Some("VS_startup"));
        assert_eq!(function_name("chapter-2").as_deref(), Some("VS_chapter_2"));
        assert_eq!(function_name(" "), None);
    }
}
