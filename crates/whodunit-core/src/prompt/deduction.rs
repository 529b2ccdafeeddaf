//! Final-deduction prompt rendering.
//!
//! The deduction prompt is assembled from pieces of the chat template: the
//! story preamble (everything before the first `###` section header) and the
//! accused suspect's own `###` section, plus the player's reasoning and the
//! conversation with the accused only.

use whodunit_types::character::Character;
use whodunit_types::chat::Message;

use super::chat::serialize_history;
use super::template::{PromptTemplate, VarMap};

/// Marker introducing a template section header line.
const SECTION_MARKER: &str = "###";

/// The story preamble: the chat template's prefix before its first `###`
/// section header.
pub fn story_context(template: &str) -> &str {
    let mut offset = 0;
    for line in template.lines() {
        if line.trim_start().starts_with(SECTION_MARKER) {
            return &template[..offset];
        }
        offset += line.len() + 1;
    }
    template
}

/// Body of the `###` section whose header contains the given display name.
///
/// Returns `None` when no such section exists; callers substitute an empty
/// string and continue rather than failing the request.
pub fn character_settings(template: &str, display_name: &str) -> Option<String> {
    let mut found = false;
    let mut body: Vec<&str> = Vec::new();

    for line in template.lines() {
        let is_header = line.trim_start().starts_with(SECTION_MARKER);
        if found {
            if is_header {
                break;
            }
            body.push(line);
        } else if is_header && line.contains(display_name) {
            found = true;
        }
    }

    found.then(|| body.join("\n").trim().to_string())
}

/// Variable map for the final deduction.
pub fn deduction_vars(
    chat_template: &PromptTemplate,
    accused: &Character,
    reasoning: &str,
    history: &[Message],
) -> VarMap {
    let settings = match character_settings(chat_template.text(), &accused.name) {
        Some(settings) => settings,
        None => {
            tracing::warn!(
                character = %accused.name,
                "no character settings section found in chat template"
            );
            String::new()
        }
    };

    VarMap::from([
        (
            "story_context".to_string(),
            story_context(chat_template.text()).to_string(),
        ),
        ("character_settings".to_string(), settings),
        ("suspect".to_string(), accused.name.clone()),
        ("reasoning".to_string(), reasoning.to_string()),
        (
            "history".to_string(),
            serialize_history(history, &accused.name),
        ),
    ])
}

/// Render the full deduction prompt.
pub fn render_deduction_prompt(
    deduction_template: &PromptTemplate,
    chat_template: &PromptTemplate,
    accused: &Character,
    reasoning: &str,
    history: &[Message],
) -> String {
    deduction_template.render(&deduction_vars(chat_template, accused, reasoning, history))
}
