//! Heuristic extraction of request parameters from a user utterance.
//!
//! All extractors lowercase their input and apply an ordered rule list;
//! the first rule that matches wins.

use regex::Regex;
use std::sync::LazyLock;

/// Phrases that introduce the topic.
///
/// Deliberately ordered longer phrases first, unlike a plain
/// generic-to-specific list: the generic "about"/"on" only match when nothing
/// more specific does. The two orders disagree when both appear, e.g.
/// "slides on fish about lakes" yields "fish about lakes" here rather than
/// "lakes".
///
/// Matching is by substring, so "on" also matches inside words such as
/// "python"; the first phrase in this list that occurs anywhere wins.
const TOPIC_INDICATORS: &[&str] = &[
    "create a presentation about",
    "create a presentation on",
    "make a presentation about",
    "make a presentation on",
    "presentation about",
    "presentation on",
    "slides about",
    "slides on",
    "ppt about",
    "ppt on",
    "about",
    "on",
];

const LEADING_ARTICLES: &[&str] = &["the ", "a ", "an "];

/// Trailing clauses cut from a topic ("... and include 5 slides").
const TOPIC_TERMINATORS: &[&str] = &[" and ", " with "];

const CREATION_VERBS: &[&str] = &["create", "make", "generate"];

const DECK_NOUNS: &[&str] = &["presentation", "ppt", "powerpoint", "slides"];

/// Words removed from the whole utterance by the last-resort topic rule.
const FILLER_WORDS: &[&str] = &[
    "create",
    "make",
    "generate",
    "presentation",
    "ppt",
    "powerpoint",
    "a",
    "an",
    "the",
];

/// Topic returned when nothing is left of the utterance.
pub const FALLBACK_TOPIC: &str = "General Topic";

/// Slide count used when the utterance does not ask for one in range.
pub const DEFAULT_SLIDE_COUNT: usize = 5;

// ASCII digits only, matching what `usize::from_str` accepts.
static SLIDE_COUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"([0-9]+)\s*slides?",
        r"include\s*([0-9]+)\s*slides?",
        r"with\s*([0-9]+)\s*slides?",
        r"want\s*([0-9]+)\s*slides?",
        r"need\s*([0-9]+)\s*slides?",
        r"make\s*([0-9]+)\s*slides?",
    ])
});

static SLIDE_NUMBER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"slide\s*([0-9]+)",
        r"slide\s*number\s*([0-9]+)",
        r"([0-9]+)(?:st|nd|rd|th)?\s*slide",
    ])
});

const ORDINALS: &[(&str, usize)] = &[
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("sixth", 6),
    ("seventh", 7),
    ("eighth", 8),
    ("ninth", 9),
    ("tenth", 10),
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                log::warn!("Skipping invalid pattern {pattern}: {e}");
                None
            }
        })
        .collect()
}

/// Inclusive range of slide counts a request may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideCountRange {
    pub min: usize,
    pub max: usize,
    /// Returned when no requested count falls in range.
    pub default: usize,
}

impl Default for SlideCountRange {
    fn default() -> Self {
        Self {
            min: 2,
            max: 15,
            default: DEFAULT_SLIDE_COUNT,
        }
    }
}

impl SlideCountRange {
    fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Extract the topic of a deck request.
///
/// The result is lowercase.
pub fn extract_topic(text: &str) -> String {
    let clean = text.trim().to_lowercase();

    for indicator in TOPIC_INDICATORS {
        if let Some((_, rest)) = clean.split_once(indicator) {
            let topic = cut_trailing_clause(strip_leading_articles(rest.trim()));
            log::debug!("Topic from indicator {indicator:?}: {topic:?}");
            return topic.trim().to_string();
        }
    }

    if CREATION_VERBS.iter().any(|verb| clean.contains(verb)) {
        let words: Vec<&str> = clean.split_whitespace().collect();
        for i in 1..words.len() {
            if DECK_NOUNS.contains(&words[i - 1]) && matches!(words[i], "on" | "about") {
                let remaining = words[i + 1..].join(" ");
                return cut_trailing_clause(&remaining).trim().to_string();
            }
        }
    }

    let fallback = clean
        .split_whitespace()
        .filter(|word| !FILLER_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ");

    if fallback.is_empty() {
        FALLBACK_TOPIC.to_string()
    } else {
        fallback
    }
}

fn strip_leading_articles(mut text: &str) -> &str {
    while let Some(rest) = strip_article(text) {
        text = rest.trim_start();
    }
    text
}

fn strip_article(text: &str) -> Option<&str> {
    LEADING_ARTICLES
        .iter()
        .find_map(|article| text.strip_prefix(article))
}

fn cut_trailing_clause(text: &str) -> &str {
    TOPIC_TERMINATORS
        .iter()
        .fold(text, |topic, terminator| match topic.split_once(terminator) {
            Some((head, _)) => head,
            None => topic,
        })
}

/// Extract the requested slide count using the default `[2, 15]` range.
pub fn extract_slide_count(text: &str) -> usize {
    extract_slide_count_in(text, SlideCountRange::default())
}

/// Extract the requested slide count, accepting only values in `range`.
pub fn extract_slide_count_in(text: &str, range: SlideCountRange) -> usize {
    let clean = text.to_lowercase();

    for pattern in SLIDE_COUNT_PATTERNS.iter() {
        if let Some(count) = first_capture(pattern, &clean) {
            if range.contains(count) {
                return count;
            }
            log::debug!("Ignoring out-of-range slide count {count}");
        }
    }

    range.default
}

/// Extract the 1-based slide number an utterance refers to, if any.
pub fn extract_slide_number(text: &str) -> Option<usize> {
    let clean = text.to_lowercase();

    let numbered = SLIDE_NUMBER_PATTERNS
        .iter()
        .filter_map(|pattern| first_capture(pattern, &clean))
        .find(|&number| number > 0);
    if numbered.is_some() {
        return numbered;
    }

    ORDINALS
        .iter()
        .find(|(word, _)| clean.contains(word))
        .map(|&(_, number)| number)
}

fn first_capture(pattern: &Regex, text: &str) -> Option<usize> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
