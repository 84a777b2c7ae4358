//! PPTX (Office Open XML) reader for conversational deck editing.
//!
//! Reads .pptx files, which are ZIP archives of XML parts, into a
//! [`deck_core::SlideDocument`].

pub mod extractor;

pub use extractor::PptxExtractor;
