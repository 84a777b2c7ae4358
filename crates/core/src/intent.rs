//! Classification of a chat turn into what the user wants done.

use serde::{Deserialize, Serialize};

const CREATE_KEYWORDS: &[&str] = &[
    "create a presentation",
    "make a presentation",
    "generate a presentation",
    "create presentation",
    "make presentation",
    "generate presentation",
    "create ppt",
    "make ppt",
    "generate ppt",
    "create powerpoint",
    "presentation on",
    "presentation about",
    "slides about",
    "slides on",
];

const EDIT_KEYWORDS: &[&str] = &[
    "edit slide",
    "modify slide",
    "change slide",
    "update slide",
    "edit content",
    "modify content",
    "change content",
    "update content",
    "edit presentation",
    "modify presentation",
    "update presentation",
];

const ADD_KEYWORDS: &[&str] = &[
    "add slide",
    "add new slide",
    "create slide",
    "insert slide",
    "add a slide",
    "create new slide",
    "new slide about",
];

const VIEW_KEYWORDS: &[&str] = &[
    "show me slide",
    "view slide",
    "display slide",
    "what's in slide",
    "slide content",
    "content of slide",
    "show slide",
];

/// What a user turn asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Build a new deck from scratch.
    CreateDeck,
    /// Rewrite one existing slide.
    EditSlide,
    /// Append a new slide.
    AddSlide,
    /// Show one slide, or an overview of all of them.
    ViewSlide,
    /// Anything else: answered by the generator as plain chat.
    Chat,
}

/// Classify an utterance. Checked in order: create, edit, add, view.
pub fn classify_intent(text: &str) -> Intent {
    let clean = text.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| clean.contains(k));

    let intent = if mentions(CREATE_KEYWORDS) {
        Intent::CreateDeck
    } else if mentions(EDIT_KEYWORDS) {
        Intent::EditSlide
    } else if mentions(ADD_KEYWORDS) {
        Intent::AddSlide
    } else if mentions(VIEW_KEYWORDS) {
        Intent::ViewSlide
    } else {
        Intent::Chat
    };

    log::debug!("Classified turn as {intent:?}");
    intent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create() {
        assert_eq!(
            classify_intent("Create a presentation about renewable energy"),
            Intent::CreateDeck
        );
        assert_eq!(classify_intent("slides on rust ownership"), Intent::CreateDeck);
    }

    #[test]
    fn test_edit() {
        assert_eq!(classify_intent("edit slide 2 to talk about costs"), Intent::EditSlide);
        assert_eq!(classify_intent("please change content of the third"), Intent::EditSlide);
    }

    #[test]
    fn test_add() {
        assert_eq!(classify_intent("add a slide about pricing"), Intent::AddSlide);
        assert_eq!(classify_intent("Insert slide on risks"), Intent::AddSlide);
    }

    #[test]
    fn test_view() {
        assert_eq!(classify_intent("show me slide 3"), Intent::ViewSlide);
        assert_eq!(classify_intent("what's in slide 1?"), Intent::ViewSlide);
    }

    #[test]
    fn test_chat() {
        assert_eq!(classify_intent("any tips for public speaking?"), Intent::Chat);
    }

    #[test]
    fn test_create_takes_priority() {
        // Mentions both creation and an edit keyword.
        assert_eq!(
            classify_intent("update presentation on tax law"),
            Intent::CreateDeck
        );
    }
}
