//! Domain types for representing a slide deck under edit.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Title reported for slides whose title is empty.
pub const UNTITLED_SLIDE: &str = "Untitled Slide";

/// The logical content of one slide: a title and its ordered bullet points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Slide title.
    pub title: String,

    /// Bullet points in display order. Never blank after construction.
    pub content: Vec<String>,
}

impl SlideRecord {
    /// Create a record, trimming points and dropping blank ones.
    pub fn new<I, S>(title: impl Into<String>, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            content: content.into_iter().map(Into::into).collect(),
        }
        .normalized()
    }

    /// Trim the title and every point, dropping points that end up empty.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.content = self
            .content
            .into_iter()
            .map(|point| point.trim().to_string())
            .filter(|point| !point.is_empty())
            .collect();
        self
    }

    /// Title to show for this slide, falling back to [`UNTITLED_SLIDE`].
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            UNTITLED_SLIDE
        } else {
            title
        }
    }

    /// Whether the record carries at least one bullet point.
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// The in-memory deck: a deck-level title plus slides in order.
///
/// Slide positions are 1-based and contiguous (position = index + 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDocument {
    /// Topic or title supplied at creation, separate from any slide title.
    pub deck_title: String,

    /// Slides in presentation order.
    pub slides: Vec<SlideRecord>,
}

impl SlideDocument {
    /// Create a document with the given deck title and slides.
    pub fn new(deck_title: impl Into<String>, slides: Vec<SlideRecord>) -> Self {
        Self {
            deck_title: deck_title.into(),
            slides,
        }
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the document has no slides (only possible for opened decks).
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Get the slide at a 1-based position.
    pub fn slide(&self, position: usize) -> Result<&SlideRecord> {
        let index = self.index_of(position)?;
        Ok(&self.slides[index])
    }

    /// Overwrite the slide at a 1-based position with a new record.
    ///
    /// The record is fully normalized before the single assignment, so the
    /// slot never holds a half-written slide.
    pub fn replace_slide(&mut self, position: usize, record: SlideRecord) -> Result<()> {
        let index = self.index_of(position)?;
        self.slides[index] = record.normalized();
        Ok(())
    }

    /// Append a slide and return its 1-based position.
    pub fn append_slide(&mut self, record: SlideRecord) -> usize {
        self.slides.push(record.normalized());
        self.slides.len()
    }

    /// One summary row per slide, ordered by position.
    pub fn summarize(&self) -> Vec<SlideSummary> {
        self.slides
            .iter()
            .enumerate()
            .map(|(index, slide)| SlideSummary {
                position: index + 1,
                title: slide.display_title().to_string(),
                point_count: slide.content.len(),
            })
            .collect()
    }

    fn index_of(&self, position: usize) -> Result<usize> {
        if position == 0 || position > self.slides.len() {
            return Err(Error::IndexOutOfRange {
                position,
                count: self.slides.len(),
            });
        }
        Ok(position - 1)
    }
}

/// A read-only overview row for one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSummary {
    /// 1-based slide position.
    pub position: usize,

    /// Slide title, or [`UNTITLED_SLIDE`] when empty.
    pub title: String,

    /// Number of bullet points on the slide.
    pub point_count: usize,
}

/// The format of a stored deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Markdown outline (`# deck`, `## slide`, `- point`).
    Markdown,
}

impl DeckFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "md" | "markdown" | "txt" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    ///
    /// Only binary formats carry a signature; Markdown is never detected here.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        None
    }

    /// Preferred file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Markdown => "md",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SlideDocument {
        SlideDocument::new(
            "solar power",
            vec![
                SlideRecord::new("Intro", ["What solar power is", "Why it matters"]),
                SlideRecord::new("Costs", ["Panel prices keep falling"]),
            ],
        )
    }

    #[test]
    fn test_record_drops_blank_points() {
        let record = SlideRecord::new("  Title ", ["  one  ", "", "   ", "two"]);
        assert_eq!(record.title, "Title");
        assert_eq!(record.content, vec!["one", "two"]);
    }

    #[test]
    fn test_display_title_default() {
        let record = SlideRecord::new("   ", ["point"]);
        assert_eq!(record.display_title(), UNTITLED_SLIDE);
    }

    #[test]
    fn test_slide_bounds() {
        let doc = sample();
        assert_eq!(doc.slide(1).unwrap().title, "Intro");
        assert_eq!(doc.slide(2).unwrap().title, "Costs");
        assert!(matches!(
            doc.slide(0),
            Err(Error::IndexOutOfRange {
                position: 0,
                count: 2
            })
        ));
        assert!(matches!(
            doc.slide(3),
            Err(Error::IndexOutOfRange {
                position: 3,
                count: 2
            })
        ));
    }

    #[test]
    fn test_replace_keeps_other_slides() {
        let mut doc = sample();
        let replacement = SlideRecord::new("Pricing", ["Cheaper every year", "Subsidies help"]);
        doc.replace_slide(2, replacement.clone()).unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.slides[0].title, "Intro");
        assert_eq!(doc.slides[1], replacement);
    }

    #[test]
    fn test_replace_is_idempotent() {
        let record = SlideRecord::new("Pricing", ["Cheaper every year"]);

        let mut once = sample();
        once.replace_slide(2, record.clone()).unwrap();

        let mut twice = sample();
        twice.replace_slide(2, record.clone()).unwrap();
        twice.replace_slide(2, record).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_replace_out_of_range_leaves_document_unchanged() {
        let mut doc = sample();
        let before = doc.clone();
        assert!(doc.replace_slide(5, SlideRecord::new("X", ["y y y y"])).is_err());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_append_returns_new_position() {
        let mut doc = sample();
        let position = doc.append_slide(SlideRecord::new("Outlook", ["Storage is next"]));
        assert_eq!(position, 3);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.slide(3).unwrap().title, "Outlook");
    }

    #[test]
    fn test_summarize_matches_slides() {
        let doc = sample();
        let summary = doc.summarize();
        assert_eq!(
            summary,
            vec![
                SlideSummary {
                    position: 1,
                    title: "Intro".to_string(),
                    point_count: 2
                },
                SlideSummary {
                    position: 2,
                    title: "Costs".to_string(),
                    point_count: 1
                },
            ]
        );
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(DeckFormat::from_extension("PPTX"), Some(DeckFormat::Pptx));
        assert_eq!(DeckFormat::from_extension("md"), Some(DeckFormat::Markdown));
        assert_eq!(DeckFormat::from_extension("ppt"), None);
        assert_eq!(
            DeckFormat::from_magic(&[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00]),
            Some(DeckFormat::Pptx)
        );
        assert_eq!(DeckFormat::from_magic(b"# Deck\n"), None);
        assert_eq!(DeckFormat::from_magic(b"PK"), None);
    }
}
