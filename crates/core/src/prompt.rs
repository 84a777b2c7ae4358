//! Prompt builders for the text generator.
//!
//! Every prompt asks for the `# Title` / `- bullet` layout that
//! [`crate::parser::parse`] understands.

use crate::types::SlideRecord;

/// Prompt for a whole new deck.
pub fn structure_prompt(topic: &str, request: &str, slide_count: usize, bullets: &str) -> String {
    format!(
        r#"Create a detailed and professional presentation structure about "{topic}".
Extract any specific requirements from this user request: "{request}"

Requirements:
- Create EXACTLY {slide_count} slides with clear, concise content
- Each slide should have {bullets} bullet points maximum
- Each bullet point should be ONE clear, complete sentence (not paragraphs)
- Use professional language and terminology
- Make each bullet point specific and actionable
- Keep bullet points between 10-25 words each

Generate EXACTLY {slide_count} slides following this structure pattern:

# Slide Title 1
- Bullet point 1 (10-25 words)
- Bullet point 2 (10-25 words)
- Bullet point 3 (10-25 words)

# Slide Title 2
- Bullet point 1 (10-25 words)
- Bullet point 2 (10-25 words)
- Bullet point 3 (10-25 words)

Continue this pattern for all {slide_count} slides. Make sure each slide has a clear, descriptive title and {bullets} bullet points.
"#
    )
}

/// Prompt for rewriting one slide.
pub fn edit_prompt(position: usize, current: &SlideRecord, request: &str) -> String {
    format!(
        r#"The user wants to edit slide {position} of their presentation.

Current slide content:
Title: {title}
Content: {content}

User's editing request: "{request}"

Generate new content for this slide based on the user's request.
Format your response as:

# New Slide Title
- Bullet point 1
- Bullet point 2
- Bullet point 3
- Bullet point 4

Keep bullet points concise (10-25 words each) and professional.
"#,
        title = current.display_title(),
        content = current.content.join(", "),
    )
}

/// Prompt for a slide to append.
pub fn add_slide_prompt(request: &str) -> String {
    format!(
        r#"The user wants to add a new slide to their presentation.
User's request: "{request}"

Create content for this new slide based on the user's request.

Format your response as:

# Slide Title (extract from user's request)
- Bullet point 1 (10-25 words)
- Bullet point 2 (10-25 words)
- Bullet point 3 (10-25 words)
- Bullet point 4 (10-25 words)

Keep bullet points concise, professional, and relevant to the topic.
"#
    )
}

/// Prompt for a general chat turn.
pub fn chat_prompt(request: &str, has_document: bool) -> String {
    let editing_hint = if has_document {
        "If they're asking about editing, suggest phrases like \"edit slide 2\" or \"add a slide about [topic]\"."
    } else {
        "If they're asking about editing, tell them to create or open a presentation first."
    };
    format!(
        r#"You are a presentation assistant. The user said: "{request}"

Provide a helpful response about presentations, slide creation, or presentation tips.
If they're asking about creating presentations, guide them to use phrases like "create a presentation about [topic]".
{editing_hint}

Keep your response friendly, professional, and focused on presentation assistance.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_prompt_mentions_count_and_topic() {
        let prompt = structure_prompt("solar power", "make 7 slides on solar power", 7, "3-5");
        assert!(prompt.contains("about \"solar power\""));
        assert!(prompt.contains("EXACTLY 7 slides"));
        assert!(prompt.contains("3-5 bullet points"));
        assert!(prompt.contains("# Slide Title 1"));
    }

    #[test]
    fn test_edit_prompt_includes_current_slide() {
        let current = SlideRecord::new("Costs", ["Panels are cheap", "Labour is not"]);
        let prompt = edit_prompt(2, &current, "make it about subsidies");
        assert!(prompt.contains("edit slide 2"));
        assert!(prompt.contains("Title: Costs"));
        assert!(prompt.contains("Content: Panels are cheap, Labour is not"));
        assert!(prompt.contains("\"make it about subsidies\""));
    }

    #[test]
    fn test_add_slide_prompt() {
        let prompt = add_slide_prompt("add a slide about risks");
        assert!(prompt.contains("\"add a slide about risks\""));
        assert!(prompt.contains("# Slide Title"));
    }

    #[test]
    fn test_chat_prompt_hint_depends_on_document() {
        assert!(chat_prompt("hi", false).contains("create or open a presentation first"));
        assert!(chat_prompt("hi", true).contains("edit slide 2"));
    }
}
