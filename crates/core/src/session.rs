//! The live slide document of one chat session.

use crate::error::{Error, Result};
use crate::render::DeckExtractor;
use crate::types::{SlideDocument, SlideRecord, SlideSummary};

/// Exclusive owner of at most one [`SlideDocument`].
///
/// A session is either absent (nothing created or opened yet) or active.
/// `create` and `open` replace whatever was there before; every other
/// operation fails with [`Error::NoActiveDocument`] while absent.
#[derive(Debug, Clone, Default)]
pub struct DeckSession {
    document: Option<SlideDocument>,
}

impl DeckSession {
    /// Create a session with no document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new document from parsed slides, discarding any current one.
    pub fn create(
        &mut self,
        deck_title: impl Into<String>,
        slides: Vec<SlideRecord>,
    ) -> &SlideDocument {
        let slides = slides
            .into_iter()
            .map(SlideRecord::normalized)
            .filter(SlideRecord::has_content)
            .collect();
        let document = SlideDocument::new(deck_title, slides);
        log::info!(
            "Created presentation '{}' with {} slides",
            document.deck_title,
            document.len()
        );
        self.document.insert(document)
    }

    /// Replace the live document verbatim with an externally extracted one.
    pub fn open(&mut self, document: SlideDocument) -> &SlideDocument {
        log::info!(
            "Opened presentation '{}' with {} slides",
            document.deck_title,
            document.len()
        );
        self.document.insert(document)
    }

    /// Extract a document from deck bytes and open it.
    ///
    /// On extraction failure the current document is left untouched.
    pub fn open_with<E: DeckExtractor + ?Sized>(
        &mut self,
        extractor: &E,
        bytes: &[u8],
        name: &str,
    ) -> Result<&SlideDocument> {
        let document = extractor.extract(bytes, name)?;
        Ok(self.open(document))
    }

    /// Whether a document is live.
    pub fn is_active(&self) -> bool {
        self.document.is_some()
    }

    /// The live document.
    pub fn document(&self) -> Result<&SlideDocument> {
        self.document.as_ref().ok_or(Error::NoActiveDocument)
    }

    /// Number of slides in the live document.
    pub fn slide_count(&self) -> Result<usize> {
        Ok(self.document()?.len())
    }

    /// Get the slide at a 1-based position.
    pub fn get_slide(&self, position: usize) -> Result<&SlideRecord> {
        self.document()?.slide(position)
    }

    /// Overwrite the slide at a 1-based position.
    pub fn replace_slide(&mut self, position: usize, record: SlideRecord) -> Result<()> {
        self.document_mut()?.replace_slide(position, record)?;
        log::info!("Replaced slide {position}");
        Ok(())
    }

    /// Append a slide, returning its 1-based position.
    pub fn append_slide(&mut self, record: SlideRecord) -> Result<usize> {
        let position = self.document_mut()?.append_slide(record);
        log::info!("Appended slide {position}");
        Ok(position)
    }

    /// Overview of every slide, in order.
    pub fn summarize(&self) -> Result<Vec<SlideSummary>> {
        Ok(self.document()?.summarize())
    }

    fn document_mut(&mut self) -> Result<&mut SlideDocument> {
        self.document.as_mut().ok_or(Error::NoActiveDocument)
    }
}
