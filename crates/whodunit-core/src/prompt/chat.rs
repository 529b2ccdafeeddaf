//! Chat-turn prompt rendering.
//!
//! Fills the interrogation template with the active suspect, the player's
//! latest message, the serialized conversation so far, and the optional
//! ambient weather line.

use whodunit_types::character::Character;
use whodunit_types::chat::{Message, MessageRole};

use super::template::{PromptTemplate, VarMap};

/// Speaker label for the player's turns in serialized history.
pub const INTERROGATOR_LABEL: &str = "Detective";

/// Render a conversation as `"<speaker>: <text>"` lines.
///
/// User turns are labeled with [`INTERROGATOR_LABEL`]; replies carry the
/// suspect's display name. System messages never occur in suspect histories
/// and are skipped.
pub fn serialize_history(history: &[Message], character_name: &str) -> String {
    history
        .iter()
        .filter_map(|msg| match msg.role {
            MessageRole::User => Some(format!("{INTERROGATOR_LABEL}: {}", msg.text)),
            MessageRole::Assistant => Some(format!("{character_name}: {}", msg.text)),
            MessageRole::System => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Variable map for one chat turn.
///
/// `weather_info` is a best-effort enrichment; pass an empty string when it
/// is unavailable.
pub fn chat_vars(
    character: &Character,
    message: &str,
    history: &[Message],
    weather_info: &str,
) -> VarMap {
    VarMap::from([
        ("character".to_string(), character.name.clone()),
        ("message".to_string(), message.to_string()),
        (
            "history".to_string(),
            serialize_history(history, &character.name),
        ),
        ("weather_info".to_string(), weather_info.to_string()),
    ])
}

/// Render the full interrogation prompt for one turn.
pub fn render_chat_prompt(
    template: &PromptTemplate,
    character: &Character,
    message: &str,
    history: &[Message],
    weather_info: &str,
) -> String {
    template.render(&chat_vars(character, message, history, weather_info))
}
