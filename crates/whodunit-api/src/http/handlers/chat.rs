//! Chat orchestration handler.
//!
//! One interrogation turn: validate the suspect, enrich with weather,
//! render the chat prompt, invoke the provider, return the reply plus the
//! final-turn signal. The caller owns the history; nothing is stored here.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use whodunit_core::prompt::chat::render_chat_prompt;
use whodunit_core::session::final_turn_reached;
use whodunit_types::chat::Message;
use whodunit_types::llm::ReplyMode;

use crate::http::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for one chat turn.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The player's latest message.
    pub message: String,
    /// Which suspect is being questioned.
    pub character_id: String,
    /// Conversation with that suspect so far (before this exchange).
    #[serde(default)]
    pub history: Vec<Message>,
}

/// Response body for one chat turn.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    /// True once the supplied history shows the last allowed exchange has
    /// been reached.
    pub is_final_turn: bool,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/chat - One interrogation turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let request_id = Uuid::now_v7();

    let is_final_turn = final_turn_reached(body.history.len());

    let character = state
        .cast
        .get(&body.character_id)
        .cloned()
        .ok_or_else(|| AppError::UnknownCharacter(body.character_id.clone()))?;

    // Best-effort flavor line; failures already logged by the client.
    let weather_info = match &state.weather {
        Some(weather) => weather
            .current_summary()
            .await
            .map(|summary| format!("It is currently {summary} outside. "))
            .unwrap_or_default(),
        None => String::new(),
    };

    let prompt = render_chat_prompt(
        &state.templates.chat,
        &character,
        &body.message,
        &body.history,
        &weather_info,
    );

    let mode = if state.structured_chat {
        ReplyMode::Structured
    } else {
        ReplyMode::Text
    };

    tracing::debug!(
        request_id = %request_id,
        character = %character.id,
        history_len = body.history.len(),
        is_final_turn,
        "chat turn"
    );

    let reply = state.provider.invoke(&prompt, mode).await?.chat_text()?;

    Ok(Json(ChatResponse {
        reply,
        is_final_turn,
    }))
}
