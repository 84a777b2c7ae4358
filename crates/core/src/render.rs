//! Renderer contracts and the built-in Markdown deck format.
//!
//! A renderer turns a finished [`SlideDocument`] into deck bytes, and an
//! extractor reads deck bytes back into a document. Visual styling is
//! entirely the back-end's business.

use crate::error::{Error, Result};
use crate::types::{DeckFormat, SlideDocument, SlideRecord};

/// Converts a slide document into a stored deck.
pub trait DeckRenderer {
    /// Format produced by [`render`](Self::render).
    fn format(&self) -> DeckFormat;

    /// Render the document to deck bytes.
    fn render(&self, document: &SlideDocument) -> Result<Vec<u8>>;
}

/// Reads a stored deck back into a slide document.
pub trait DeckExtractor {
    /// Extract a document from deck bytes. `name` is the original file name
    /// and may be used as the deck title when the deck has none.
    fn extract(&self, bytes: &[u8], name: &str) -> Result<SlideDocument>;
}

/// Markdown outline renderer.
///
/// Output layout, which [`MarkdownRenderer::extract_text`] reads back:
/// ```text
/// # Deck title
///
/// ## Slide title
/// - Point one
/// - Point two
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    /// Whether to emit the `# deck title` line.
    deck_heading: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self { deck_heading: true }
    }
}

impl MarkdownRenderer {
    /// Create a renderer that writes the deck heading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to write the `# deck title` line.
    pub fn with_deck_heading(mut self, deck_heading: bool) -> Self {
        self.deck_heading = deck_heading;
        self
    }

    /// Render the document as Markdown text with a trailing newline.
    pub fn render_text(&self, document: &SlideDocument) -> String {
        let mut sections = Vec::with_capacity(document.len() + 1);

        if self.deck_heading && !document.deck_title.trim().is_empty() {
            sections.push(format!("# {}", document.deck_title.trim()));
        }

        for slide in &document.slides {
            let mut section = format!("## {}", slide.display_title());
            for point in &slide.content {
                section.push_str("\n- ");
                section.push_str(point);
            }
            sections.push(section);
        }

        if sections.is_empty() {
            return String::new();
        }
        format!("{}\n", sections.join("\n\n"))
    }

    /// Read Markdown text back into a document.
    ///
    /// A leading `# ` line is the deck title when `## ` slide headers follow
    /// it; otherwise `# ` lines are slide headers too and `name` supplies the
    /// deck title. Every header becomes a slide, even one without points,
    /// and every non-empty line under a header is kept as a point.
    pub fn extract_text(&self, text: &str, name: &str) -> SlideDocument {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let has_slide_headers = lines.iter().any(|line| line.starts_with(SLIDE_HEADER));
        let (deck_title, body) = match lines.split_first() {
            Some((first, rest)) if has_slide_headers => match first.strip_prefix(DECK_HEADER) {
                Some(title) => (title.trim().to_string(), rest),
                None => (deck_title_from_name(name), &lines[..]),
            },
            _ => (deck_title_from_name(name), &lines[..]),
        };

        let mut slides: Vec<SlideRecord> = Vec::new();
        for line in body {
            if let Some(title) = strip_header(line) {
                slides.push(SlideRecord::new(title, Vec::<String>::new()));
                continue;
            }
            match slides.last_mut() {
                Some(slide) => {
                    let point = strip_bullet(line).trim();
                    if !point.is_empty() {
                        slide.content.push(point.to_string());
                    }
                }
                None => log::debug!("Skipping text before the first slide: {line}"),
            }
        }

        SlideDocument::new(deck_title, slides)
    }
}

const DECK_HEADER: &str = "# ";
const SLIDE_HEADER: &str = "## ";
const BULLETS: &[&str] = &["- ", "* ", "• "];

fn strip_header(line: &str) -> Option<&str> {
    line.strip_prefix(SLIDE_HEADER)
        .or_else(|| line.strip_prefix(DECK_HEADER))
}

fn strip_bullet(line: &str) -> &str {
    BULLETS
        .iter()
        .find_map(|bullet| line.strip_prefix(bullet))
        .unwrap_or(line)
}

impl DeckRenderer for MarkdownRenderer {
    fn format(&self) -> DeckFormat {
        DeckFormat::Markdown
    }

    fn render(&self, document: &SlideDocument) -> Result<Vec<u8>> {
        Ok(self.render_text(document).into_bytes())
    }
}

impl DeckExtractor for MarkdownRenderer {
    fn extract(&self, bytes: &[u8], name: &str) -> Result<SlideDocument> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::UnsupportedFormat(format!("Markdown deck is not UTF-8: {}", e)))?;
        Ok(self.extract_text(text, name))
    }
}

/// Deck title derived from a file name: the name without its extension.
pub fn deck_title_from_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(base)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SlideDocument {
        SlideDocument::new(
            "renewable energy",
            vec![
                SlideRecord::new("Solar", ["Panels convert sunlight", "Costs keep falling"]),
                SlideRecord::new("Wind", ["Turbines work offshore"]),
            ],
        )
    }

    #[test]
    fn test_render_layout() {
        let text = MarkdownRenderer::new().render_text(&sample());
        let expected = "\
# renewable energy

## Solar
- Panels convert sunlight
- Costs keep falling

## Wind
- Turbines work offshore
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_without_deck_heading() {
        let text = MarkdownRenderer::new()
            .with_deck_heading(false)
            .render_text(&sample());
        assert!(text.starts_with("## Solar\n"));
    }

    #[test]
    fn test_render_untitled_slide() {
        let doc = SlideDocument::new("", vec![SlideRecord::new("", ["Orphaned point"])]);
        assert_eq!(
            MarkdownRenderer::new().render_text(&doc),
            "## Untitled Slide\n- Orphaned point\n"
        );
    }

    #[test]
    fn test_render_empty_document() {
        let doc = SlideDocument::new("", Vec::new());
        assert_eq!(MarkdownRenderer::new().render_text(&doc), "");
    }

    #[test]
    fn test_extract_reads_rendered_deck() {
        let renderer = MarkdownRenderer::new();
        let bytes = renderer.render(&sample()).unwrap();
        let doc = renderer.extract(&bytes, "ignored.md").unwrap();
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_extract_title_from_file_name() {
        let doc = MarkdownRenderer::new().extract_text("## Only\n- A single point\n", "decks/My Talk.md");
        assert_eq!(doc.deck_title, "My Talk");
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_extract_keeps_title_only_and_short_points() {
        let doc = SlideDocument::new(
            "Town hall",
            vec![
                SlideRecord::new("Welcome", Vec::<String>::new()),
                SlideRecord::new("Numbers", ["Revenue grew 12% this year"]),
                SlideRecord::new("Q&A", ["Yes", "Thanks all"]),
            ],
        );
        let renderer = MarkdownRenderer::new();
        let bytes = renderer.render(&doc).unwrap();
        let reopened = renderer.extract(&bytes, "town_hall.md").unwrap();

        assert_eq!(reopened.len(), 3);
        assert_eq!(reopened, doc);
    }

    #[test]
    fn test_extract_single_hash_outline_has_no_deck_title() {
        let text = "# Introduction\n- What we will cover today\n\n# Results\n- Everything went up\n";
        let doc = MarkdownRenderer::new().extract_text(text, "outline.md");

        assert_eq!(doc.deck_title, "outline");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.slides[0].title, "Introduction");
        assert_eq!(doc.slides[1].content, vec!["Everything went up"]);
    }

    #[test]
    fn test_extract_lone_heading_is_a_slide() {
        let doc = MarkdownRenderer::new().extract_text("# Just a title\n", "x.md");
        assert_eq!(doc.deck_title, "x");
        assert_eq!(doc.len(), 1);
        assert!(!doc.slides[0].has_content());
    }

    #[test]
    fn test_extract_empty_text_has_no_slides() {
        let doc = MarkdownRenderer::new().extract_text("", "empty.md");
        assert_eq!(doc.deck_title, "empty");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_extract_rejects_invalid_utf8() {
        let result = MarkdownRenderer::new().extract(&[0xFF, 0xFE, 0x00], "bad.md");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_deck_title_from_name() {
        assert_eq!(deck_title_from_name("Quarterly Review.pptx"), "Quarterly Review");
        assert_eq!(deck_title_from_name("/tmp/talk.md"), "talk");
        assert_eq!(deck_title_from_name("noext"), "noext");
    }
}
