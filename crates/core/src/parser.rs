//! Structured-text parser for generated slide outlines.
//!
//! Turns a free-form text blob (usually generator output) into an ordered
//! list of [`SlideRecord`]s. The scan is line-oriented and never fails:
//! text without usable structure yields a single fallback slide.
//!
//! Line rules, in priority order:
//! - `# Title` / `## Title` starts a new slide.
//! - `- point`, `* point`, `• point` adds a bullet (more than 3 characters).
//! - any other line longer than 10 characters is kept verbatim as a bullet.
//!
//! A slide that never receives a bullet is dropped, and anything before
//! the first header is ignored.

use crate::types::SlideRecord;

/// Header markers, checked before bullets so `# - x` is a header.
const HEADER_MARKERS: &[&str] = &["# ", "## "];

/// Bullet markers.
const BULLET_MARKERS: &[&str] = &["- ", "* ", "• "];

/// Bullets must be longer than this many characters.
const MIN_BULLET_CHARS: usize = 3;

/// Plain lines must be longer than this many characters.
const MIN_PLAIN_CHARS: usize = 10;

/// Title of the fallback slide.
pub const FALLBACK_TITLE: &str = "Main Topic";

/// Bullets of the fallback slide.
pub const FALLBACK_CONTENT: [&str; 4] = [
    "Key point about the topic",
    "Important benefits and applications",
    "Current trends and developments",
    "Future opportunities and challenges",
];

/// The slide used when parsing yields nothing.
pub fn fallback_slide() -> SlideRecord {
    SlideRecord {
        title: FALLBACK_TITLE.to_string(),
        content: FALLBACK_CONTENT.iter().map(|s| s.to_string()).collect(),
    }
}

/// Parse generated text into slides, never returning an empty list.
pub fn parse(raw: &str) -> Vec<SlideRecord> {
    let slides = parse_records(raw);
    if slides.is_empty() {
        log::debug!("No slides parsed, using fallback structure");
        return vec![fallback_slide()];
    }
    slides
}

/// Parse generated text into slides without the fallback.
///
/// Returns an empty list when no header received content.
pub fn parse_records(raw: &str) -> Vec<SlideRecord> {
    let slides = raw
        .lines()
        .fold(ParseState::default(), |state, line| state.step(line.trim()))
        .finish();
    log::debug!("Parsed {} slides", slides.len());
    slides
}

/// Classification of a single trimmed line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Header(&'a str),
    Bullet(&'a str),
    Plain(&'a str),
    Skip,
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some(title) = strip_any(line, HEADER_MARKERS) {
            return Line::Header(title.trim());
        }

        if let Some(point) = strip_any(line, BULLET_MARKERS) {
            let point = point.trim();
            if point.chars().count() > MIN_BULLET_CHARS {
                return Line::Bullet(point);
            }
            // Short bullets are dropped, never treated as plain text.
            return Line::Skip;
        }

        if !line.is_empty() && !line.starts_with('#') && line.chars().count() > MIN_PLAIN_CHARS {
            return Line::Plain(line);
        }

        Line::Skip
    }
}

fn strip_any<'a>(line: &'a str, markers: &[&str]) -> Option<&'a str> {
    markers.iter().find_map(|marker| line.strip_prefix(marker))
}

/// Fold state: slides emitted so far plus the slide being accumulated.
#[derive(Debug, Default)]
struct ParseState {
    slides: Vec<SlideRecord>,
    current: Option<SlideRecord>,
}

impl ParseState {
    fn step(mut self, line: &str) -> Self {
        match Line::classify(line) {
            Line::Header(title) => {
                self.flush();
                self.current = Some(SlideRecord {
                    title: title.to_string(),
                    content: Vec::new(),
                });
            }
            Line::Bullet(text) | Line::Plain(text) => {
                // Orphaned lines before the first header fall through here.
                if let Some(current) = self.current.as_mut() {
                    current.content.push(text.to_string());
                }
            }
            Line::Skip => {}
        }
        self
    }

    fn flush(&mut self) {
        if let Some(slide) = self.current.take() {
            if slide.has_content() {
                log::debug!(
                    "Added slide: {} with {} points",
                    slide.title,
                    slide.content.len()
                );
                self.slides.push(slide);
            } else {
                log::debug!("Dropped slide without content: {}", slide.title);
            }
        }
    }

    fn finish(mut self) -> Vec<SlideRecord> {
        self.flush();
        self.slides
    }
}
