//! Error types for deck editing.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or editing a slide document.
///
/// Malformed generated text is deliberately absent: the parser always
/// degrades to a fallback slide instead of failing.
#[derive(Error, Debug)]
pub enum Error {
    /// A query or mutation was attempted before a document was created or opened.
    #[error("No active presentation: create or open one first")]
    NoActiveDocument,

    /// A 1-based slide position outside `[1, count]`.
    #[error("Slide {position} not found (presentation has {count} slides)")]
    IndexOutOfRange { position: usize, count: usize },

    /// The external text generator failed; the message is passed through as-is.
    #[error("Error generating content: {0}")]
    Generation(String),

    /// Failed to read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The deck format is not supported or could not be detected.
    #[error("Unsupported or unrecognized deck format: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// Invalid assistant configuration.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
