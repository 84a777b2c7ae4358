//! Core of a conversational slide-deck editor: heuristic request
//! extraction, a total parser for generated slide outlines, the in-memory
//! slide document, and per-turn orchestration around an external text
//! generator and renderer.

pub mod assistant;
pub mod config;
pub mod error;
pub mod extract;
pub mod intent;
pub mod normalize;
pub mod parser;
pub mod prompt;
pub mod render;
pub mod session;
pub mod types;

pub use assistant::{Assistant, TextGenerator, TurnOutcome};
pub use config::AssistantConfig;
pub use error::{Error, Result};
pub use extract::{extract_slide_count, extract_slide_number, extract_topic, SlideCountRange};
pub use intent::{classify_intent, Intent};
pub use parser::parse;
pub use render::{DeckExtractor, DeckRenderer, MarkdownRenderer};
pub use session::DeckSession;
pub use types::{DeckFormat, SlideDocument, SlideRecord, SlideSummary};
