//! Chat-turn orchestration.
//!
//! Each turn runs: intent classification, parameter extraction, prompt
//! construction, one generator call, parsing, and a single document
//! mutation. The outcome is returned as a value; its `Display` form is the
//! chat reply.

use crate::config::AssistantConfig;
use crate::error::{Error, Result};
use crate::extract::{extract_slide_count_in, extract_slide_number, extract_topic};
use crate::intent::{classify_intent, Intent};
use crate::parser;
use crate::prompt;
use crate::session::DeckSession;
use crate::types::{SlideRecord, SlideSummary};
use std::fmt;

/// External text generator.
///
/// Implementations own transport, retries and cancellation. Failures should
/// be reported as [`Error::Generation`].
pub trait TextGenerator {
    /// Generate text for a prompt.
    fn generate(&mut self, prompt: &str) -> Result<String>;
}

impl<G: TextGenerator + ?Sized> TextGenerator for &mut G {
    fn generate(&mut self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}

impl<G: TextGenerator + ?Sized> TextGenerator for Box<G> {
    fn generate(&mut self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}

/// Result of handling one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A new deck replaced the session's document.
    Created {
        deck_title: String,
        requested_slides: usize,
        summary: Vec<SlideSummary>,
    },
    /// A slide was rewritten.
    Edited { position: usize, slide: SlideRecord },
    /// A slide was appended.
    Appended {
        position: usize,
        slide: SlideRecord,
    },
    /// One slide was shown.
    Viewed { position: usize, slide: SlideRecord },
    /// All slides were listed.
    Overview {
        summary: Vec<SlideSummary>,
        title_width: usize,
    },
    /// The request needs a document and none is active.
    NeedsDocument { intent: Intent },
    /// An edit request did not say which slide.
    NeedsSlideNumber { slide_count: usize },
    /// The referenced slide does not exist.
    SlideNotFound { position: usize, slide_count: usize },
    /// Plain chat reply from the generator.
    Chat { text: String },
    /// The generator failed; the message is passed through.
    GenerationFailed { message: String },
}

impl TurnOutcome {
    /// Whether the document changed, so the caller should re-render it.
    pub fn mutated(&self) -> bool {
        matches!(
            self,
            Self::Created { .. } | Self::Edited { .. } | Self::Appended { .. }
        )
    }
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created {
                deck_title,
                requested_slides,
                summary,
            } => {
                writeln!(
                    f,
                    "I've created a {requested_slides}-slide presentation about {deck_title}!"
                )?;
                writeln!(f)?;
                writeln!(f, "Presentation overview:")?;
                for row in summary {
                    writeln!(f, "- Slide {}: {}", row.position, row.title)?;
                }
                Ok(())
            }
            Self::Edited { position, slide } => {
                writeln!(f, "Successfully updated slide {position}!")?;
                writeln!(f, "- New title: {}", slide.display_title())?;
                writeln!(f, "- Updated content: {} bullet points", slide.content.len())
            }
            Self::Appended { position, slide } => {
                writeln!(f, "Successfully added a new slide!")?;
                writeln!(f, "- Slide {position}: {}", slide.display_title())?;
                writeln!(f, "- Content: {} bullet points", slide.content.len())
            }
            Self::Viewed { position, slide } => {
                writeln!(f, "Slide {position} content:")?;
                writeln!(f, "Title: {}", slide.display_title())?;
                if slide.content.is_empty() {
                    return writeln!(f, "Content: No content found");
                }
                writeln!(f, "Content:")?;
                for (i, point) in slide.content.iter().enumerate() {
                    writeln!(f, "{}. {}", i + 1, crate::normalize::clean_point(point))?;
                }
                Ok(())
            }
            Self::Overview {
                summary,
                title_width,
            } => {
                writeln!(f, "Presentation overview:")?;
                writeln!(f, "Total slides: {}", summary.len())?;
                for row in summary {
                    writeln!(
                        f,
                        "- Slide {}: {} ({} points)",
                        row.position,
                        shorten(&row.title, *title_width),
                        row.point_count
                    )?;
                }
                Ok(())
            }
            Self::NeedsDocument { intent } => {
                let action = match intent {
                    Intent::EditSlide => "editing",
                    Intent::AddSlide => "adding slides",
                    _ => "viewing slides",
                };
                writeln!(
                    f,
                    "Please create or open a presentation first before {action}."
                )
            }
            Self::NeedsSlideNumber { slide_count } => {
                writeln!(f, "I can help you edit your presentation!")?;
                writeln!(f, "Your presentation has {slide_count} slides.")?;
                writeln!(f, "Try commands like:")?;
                writeln!(f, "- 'Edit slide 2 title to New Marketing Strategy'")?;
                writeln!(f, "- 'Modify slide 3 content about social media'")?;
                writeln!(f, "Which slide would you like to edit?")
            }
            Self::SlideNotFound {
                position,
                slide_count,
            } => writeln!(
                f,
                "Slide {position} not found. The presentation has {slide_count} slides."
            ),
            Self::Chat { text } => writeln!(f, "{}", text.trim_end()),
            Self::GenerationFailed { message } => writeln!(f, "{message}"),
        }
    }
}

/// Shorten a title to `width` characters, marking the cut with "...".
fn shorten(title: &str, width: usize) -> String {
    if title.chars().count() <= width {
        return title.to_string();
    }
    let head: String = title.chars().take(width).collect();
    format!("{head}...")
}

/// Drives one session: owns the document, the generator and the config.
pub struct Assistant<G> {
    generator: G,
    session: DeckSession,
    config: AssistantConfig,
}

impl<G: TextGenerator> Assistant<G> {
    /// Create an assistant with the default config and no document.
    pub fn new(generator: G) -> Self {
        Self::with_config(generator, AssistantConfig::default())
    }

    /// Create an assistant with a specific config.
    pub fn with_config(generator: G, config: AssistantConfig) -> Self {
        Self {
            generator,
            session: DeckSession::new(),
            config,
        }
    }

    /// The session holding the live document.
    pub fn session(&self) -> &DeckSession {
        &self.session
    }

    /// Mutable access to the session, e.g. to open a deck.
    pub fn session_mut(&mut self) -> &mut DeckSession {
        &mut self.session
    }

    /// Handle one user turn.
    ///
    /// Never fails: generator errors and invalid slide references become
    /// outcomes describing what went wrong.
    pub fn handle_turn(&mut self, text: &str) -> TurnOutcome {
        let intent = classify_intent(text);
        let result = match intent {
            Intent::CreateDeck => self.create_deck(text),
            Intent::EditSlide => self.edit_slide(text),
            Intent::AddSlide => self.add_slide(text),
            Intent::ViewSlide => self.view_slide(text),
            Intent::Chat => self.chat(text),
        };

        match result {
            Ok(outcome) => outcome,
            Err(Error::NoActiveDocument) => TurnOutcome::NeedsDocument { intent },
            Err(Error::IndexOutOfRange { position, count }) => TurnOutcome::SlideNotFound {
                position,
                slide_count: count,
            },
            Err(e) => {
                log::warn!("Turn failed: {e}");
                TurnOutcome::GenerationFailed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Overview of the current document, without calling the generator.
    pub fn overview(&self) -> TurnOutcome {
        match self.session.summarize() {
            Ok(summary) => TurnOutcome::Overview {
                summary,
                title_width: self.config.overview_title_width,
            },
            Err(_) => TurnOutcome::NeedsDocument {
                intent: Intent::ViewSlide,
            },
        }
    }

    fn create_deck(&mut self, text: &str) -> Result<TurnOutcome> {
        let topic = extract_topic(text);
        let slide_count = extract_slide_count_in(text, self.config.slide_count_range());
        log::info!("Creating {slide_count}-slide presentation about '{topic}'");

        let request = prompt::structure_prompt(
            &topic,
            text,
            slide_count,
            &self.config.bullets_per_slide,
        );
        let generated = self.generator.generate(&request)?;
        let slides = parser::parse(&generated);

        let document = self.session.create(topic, slides);
        Ok(TurnOutcome::Created {
            deck_title: document.deck_title.clone(),
            requested_slides: slide_count,
            summary: document.summarize(),
        })
    }

    fn edit_slide(&mut self, text: &str) -> Result<TurnOutcome> {
        let slide_count = self.session.slide_count()?;
        let Some(position) = extract_slide_number(text) else {
            return Ok(TurnOutcome::NeedsSlideNumber { slide_count });
        };

        let current = self.session.get_slide(position)?;
        let request = prompt::edit_prompt(position, current, text);
        let generated = self.generator.generate(&request)?;
        let slide = first_slide(&generated);

        self.session.replace_slide(position, slide.clone())?;
        Ok(TurnOutcome::Edited { position, slide })
    }

    fn add_slide(&mut self, text: &str) -> Result<TurnOutcome> {
        // Fail before generating when there is nothing to add to.
        self.session.document()?;

        let request = prompt::add_slide_prompt(text);
        let generated = self.generator.generate(&request)?;
        let slide = first_slide(&generated);

        let position = self.session.append_slide(slide.clone())?;
        Ok(TurnOutcome::Appended { position, slide })
    }

    fn view_slide(&mut self, text: &str) -> Result<TurnOutcome> {
        match extract_slide_number(text) {
            Some(position) => Ok(TurnOutcome::Viewed {
                position,
                slide: self.session.get_slide(position)?.clone(),
            }),
            None => Ok(TurnOutcome::Overview {
                summary: self.session.summarize()?,
                title_width: self.config.overview_title_width,
            }),
        }
    }

    fn chat(&mut self, text: &str) -> Result<TurnOutcome> {
        let request = prompt::chat_prompt(text, self.session.is_active());
        let text = self.generator.generate(&request)?;
        Ok(TurnOutcome::Chat { text })
    }
}

/// First parsed slide of a generated reply; the parser never returns none.
fn first_slide(generated: &str) -> SlideRecord {
    parser::parse(generated)
        .into_iter()
        .next()
        .unwrap_or_else(parser::fallback_slide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned replies and records the prompts it saw.
    #[derive(Default)]
    struct ScriptedGenerator {
        replies: VecDeque<Result<String>>,
        prompts: Vec<String>,
    }

    impl ScriptedGenerator {
        fn reply(mut self, text: &str) -> Self {
            self.replies.push_back(Ok(text.to_string()));
            self
        }

        fn fail(mut self, message: &str) -> Self {
            self.replies
                .push_back(Err(Error::Generation(message.to_string())));
            self
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn generate(&mut self, prompt: &str) -> Result<String> {
            self.prompts.push(prompt.to_string());
            self.replies
                .pop_front()
                .unwrap_or_else(|| Err(Error::Generation("no scripted reply".to_string())))
        }
    }

    const DECK: &str = "\
# Why Solar
- Sunlight is abundant and free everywhere
- Panels last for decades

# Costs
- Prices dropped ninety percent in ten years
";

    /// An assistant that has already created a deck from [`DECK`]; the
    /// generator's own replies are used by later turns.
    fn assistant_with_deck(mut generator: ScriptedGenerator) -> Assistant<ScriptedGenerator> {
        generator.replies.push_front(Ok(DECK.to_string()));
        let mut assistant = Assistant::new(generator);
        let outcome = assistant.handle_turn("create a presentation about solar power with 2 slides");
        assert!(matches!(outcome, TurnOutcome::Created { .. }));
        assistant
    }

    #[test]
    fn test_create_deck() {
        let mut assistant = Assistant::new(ScriptedGenerator::default().reply(DECK));
        let outcome = assistant
            .handle_turn("create a presentation about solar power and include 4 slides");

        assert!(outcome.mutated());
        match &outcome {
            TurnOutcome::Created {
                deck_title,
                requested_slides,
                summary,
            } => {
                assert_eq!(deck_title, "solar power");
                assert_eq!(*requested_slides, 4);
                assert_eq!(summary.len(), 2);
                assert_eq!(summary[0].title, "Why Solar");
                assert_eq!(summary[1].point_count, 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let prompt = &assistant.generator.prompts[0];
        assert!(prompt.contains("EXACTLY 4 slides"));
        assert!(outcome.to_string().contains("- Slide 2: Costs"));
    }

    #[test]
    fn test_create_with_unusable_reply_uses_fallback() {
        let mut assistant =
            Assistant::new(ScriptedGenerator::default().reply("Sorry, I can't do that."));
        assistant.handle_turn("make a presentation on tides");

        let doc = assistant.session().document().unwrap();
        assert_eq!(doc.deck_title, "tides");
        assert_eq!(doc.slides, vec![parser::fallback_slide()]);
    }

    #[test]
    fn test_edit_slide() {
        let generator = ScriptedGenerator::default()
            .reply("# Falling Costs\n- Module prices keep dropping\n- Installers compete hard\n");
        let mut assistant = assistant_with_deck(generator);

        let outcome = assistant.handle_turn("edit slide 2 to focus on installer competition");
        assert_eq!(
            outcome,
            TurnOutcome::Edited {
                position: 2,
                slide: SlideRecord::new(
                    "Falling Costs",
                    ["Module prices keep dropping", "Installers compete hard"]
                ),
            }
        );
        assert_eq!(
            assistant.session().get_slide(2).unwrap().title,
            "Falling Costs"
        );
        assert_eq!(assistant.session().slide_count().unwrap(), 2);
        assert!(assistant.generator.prompts[1].contains("Title: Costs"));
    }

    #[test]
    fn test_edit_without_number_asks_which_slide() {
        let mut assistant = assistant_with_deck(ScriptedGenerator::default());
        let outcome = assistant.handle_turn("change content to be shorter");
        assert_eq!(outcome, TurnOutcome::NeedsSlideNumber { slide_count: 2 });
        // No generator call for the unanswerable edit.
        assert_eq!(assistant.generator.prompts.len(), 1);
    }

    #[test]
    fn test_edit_missing_slide() {
        let mut assistant = assistant_with_deck(ScriptedGenerator::default());
        let outcome = assistant.handle_turn("edit slide 9");
        assert_eq!(
            outcome,
            TurnOutcome::SlideNotFound {
                position: 9,
                slide_count: 2
            }
        );
        assert!(!outcome.mutated());
    }

    #[test]
    fn test_edit_without_document() {
        let mut assistant = Assistant::new(ScriptedGenerator::default());
        let outcome = assistant.handle_turn("edit slide 1");
        assert_eq!(
            outcome,
            TurnOutcome::NeedsDocument {
                intent: Intent::EditSlide
            }
        );
    }

    #[test]
    fn test_add_slide() {
        let generator =
            ScriptedGenerator::default().reply("# Risks\n- Grid capacity limits growth\n");
        let mut assistant = assistant_with_deck(generator);

        let outcome = assistant.handle_turn("add a slide about risks");
        match outcome {
            TurnOutcome::Appended { position, slide } => {
                assert_eq!(position, 3);
                assert_eq!(slide.title, "Risks");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(assistant.session().slide_count().unwrap(), 3);
    }

    #[test]
    fn test_add_slide_without_document_skips_generation() {
        let mut assistant = Assistant::new(ScriptedGenerator::default());
        let outcome = assistant.handle_turn("add a slide about risks");
        assert_eq!(
            outcome,
            TurnOutcome::NeedsDocument {
                intent: Intent::AddSlide
            }
        );
        assert!(assistant.generator.prompts.is_empty());
    }

    #[test]
    fn test_view_slide_and_overview() {
        let mut assistant = assistant_with_deck(ScriptedGenerator::default());

        let outcome = assistant.handle_turn("show me slide 1");
        let reply = outcome.to_string();
        assert!(reply.contains("Title: Why Solar"));
        assert!(reply.contains("2. Panels last for decades"));

        let outcome = assistant.handle_turn("view slide overview");
        match &outcome {
            TurnOutcome::Overview { summary, .. } => assert_eq!(summary.len(), 2),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(outcome
            .to_string()
            .contains("- Slide 1: Why Solar (2 points)"));
    }

    #[test]
    fn test_generation_failure_leaves_document_untouched() {
        let generator = ScriptedGenerator::default().fail("quota exceeded");
        let mut assistant = assistant_with_deck(generator);
        let before = assistant.session().document().unwrap().clone();

        let outcome = assistant.handle_turn("edit slide 1 please");
        assert_eq!(
            outcome,
            TurnOutcome::GenerationFailed {
                message: "Error generating content: quota exceeded".to_string()
            }
        );
        assert_eq!(assistant.session().document().unwrap(), &before);
    }

    #[test]
    fn test_chat_turn() {
        let generator = ScriptedGenerator::default().reply("Keep slides short.\n");
        let mut assistant = Assistant::new(generator);
        let outcome = assistant.handle_turn("any tips?");
        assert_eq!(
            outcome,
            TurnOutcome::Chat {
                text: "Keep slides short.\n".to_string()
            }
        );
        assert_eq!(outcome.to_string(), "Keep slides short.\n");
    }

    #[test]
    fn test_overview_shortens_long_titles() {
        let outcome = TurnOutcome::Overview {
            summary: vec![SlideSummary {
                position: 1,
                title: "A very long slide title that keeps going".to_string(),
                point_count: 3,
            }],
            title_width: 10,
        };
        assert!(outcome
            .to_string()
            .contains("- Slide 1: A very lon... (3 points)"));
    }

    #[test]
    fn test_custom_slide_range() {
        let config = AssistantConfig {
            max_slide_count: 25,
            ..AssistantConfig::default()
        };
        let mut assistant =
            Assistant::with_config(ScriptedGenerator::default().reply(DECK), config);
        let outcome = assistant.handle_turn("make a presentation on tides with 20 slides");
        assert!(matches!(
            outcome,
            TurnOutcome::Created {
                requested_slides: 20,
                ..
            }
        ));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut first = assistant_with_deck(ScriptedGenerator::default());
        let second = Assistant::new(ScriptedGenerator::default());

        first.handle_turn("add a slide about more things");
        assert!(first.session().is_active());
        assert!(!second.session().is_active());
    }
}
