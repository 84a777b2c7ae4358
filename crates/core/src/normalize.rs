//! Text cleanup for slide content read back from decks.
//!
//! Handles bullet glyph removal, Unicode composition, whitespace collapsing,
//! and turning a topic into a safe file name.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse runs of whitespace into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Glyphs that renderers put in front of bullet paragraphs.
const BULLET_GLYPHS: &[char] = &['•', '▪', '◦', '‣', '-', '*'];

/// Characters dropped from file stems.
const UNSAFE_STEM_CHARS: &[char] = &[':', '?', '*', '<', '>', '|', '"', '\n', '\r'];

/// Clean a single bullet point.
///
/// - Composes Unicode to NFC
/// - Strips leading bullet glyphs (`•`, `-`, `*`, ...)
/// - Collapses whitespace runs to single spaces and trims
pub fn clean_point(text: &str) -> String {
    let composed: String = text.nfc().collect();
    let stripped = composed
        .trim_start()
        .trim_start_matches(|c: char| BULLET_GLYPHS.contains(&c) || c.is_whitespace());
    collapse_whitespace(stripped)
}

/// Collapse whitespace runs (including line breaks) and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_COLLAPSE_REGEX
        .replace_all(text.trim(), " ")
        .into_owned()
}

/// Clean a list of points, dropping those that end up empty.
pub fn clean_points<I, S>(points: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    points
        .into_iter()
        .map(|p| clean_point(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Turn a topic into a lowercase, filesystem-safe file stem.
///
/// Spaces and slashes become underscores; quotes, wildcards, colons, pipes,
/// angle brackets and line breaks are removed.
pub fn safe_file_stem(topic: &str) -> String {
    let stem: String = topic
        .trim()
        .chars()
        .filter(|c| !UNSAFE_STEM_CHARS.contains(c))
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect::<String>()
        .to_lowercase();

    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}

/// Suggested file name for saving a deck about `topic`.
pub fn suggested_file_name(topic: &str, extension: &str) -> String {
    format!("{}_presentation.{}", safe_file_stem(topic), extension)
}
