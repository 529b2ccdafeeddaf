//! Final-deduction handler.
//!
//! The single case-closing call: validate the accused, render the deduction
//! prompt from the accused's conversation only, invoke the provider in
//! structured mode, and decide correctness against the fixed culprit.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use whodunit_core::prompt::deduction::render_deduction_prompt;
use whodunit_types::chat::Message;
use whodunit_types::llm::ReplyMode;

use crate::http::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for the final deduction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionRequest {
    /// The accused suspect.
    pub character_id: String,
    /// The player's theory of the case.
    pub reasoning: String,
    /// All conversations, keyed by character id. Only the accused's is
    /// used in the prompt.
    #[serde(default)]
    pub histories: HashMap<String, Vec<Message>>,
}

/// Response body for the final deduction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionResponse {
    pub is_correct: bool,
    pub response: String,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/final-deduction - Close the case.
///
/// Intended to be called at most once per session; idempotency is the front
/// end's responsibility, not enforced here.
pub async fn final_deduction(
    State(state): State<AppState>,
    Json(body): Json<DeductionRequest>,
) -> Result<Json<DeductionResponse>, AppError> {
    let request_id = Uuid::now_v7();

    let accused = state
        .cast
        .get(&body.character_id)
        .cloned()
        .ok_or_else(|| AppError::UnknownCharacter(body.character_id.clone()))?;

    let history = body
        .histories
        .get(&body.character_id)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let prompt = render_deduction_prompt(
        &state.templates.deduction,
        &state.templates.chat,
        &accused,
        &body.reasoning,
        history,
    );

    tracing::debug!(
        request_id = %request_id,
        accused = %accused.id,
        history_len = history.len(),
        "final deduction"
    );

    let reply = state.provider.invoke(&prompt, ReplyMode::Structured).await?;

    Ok(Json(DeductionResponse {
        is_correct: state.cast.is_culprit(&accused.id),
        response: reply.narrative_text(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use whodunit_types::character::Cast;

    #[test]
    fn test_request_accepts_camel_case_wire_format() {
        let json = r#"{
            "characterId": "oliver",
            "reasoning": "He needed the inheritance.",
            "histories": {
                "oliver": [{"role": "user", "text": "Did you do it?"}]
            }
        }"#;
        let body: DeductionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(body.character_id, "oliver");
        assert_eq!(body.histories["oliver"].len(), 1);
    }

    #[test]
    fn test_response_wire_format() {
        let response = DeductionResponse {
            is_correct: false,
            response: "The evidence points elsewhere.".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isCorrect"], false);
        assert_eq!(json["response"], "The evidence points elsewhere.");
    }

    #[test]
    fn test_correctness_is_independent_of_reasoning() {
        // The verdict flag depends only on the accused identity.
        let cast = Cast::standard();
        assert!(cast.is_culprit("emilia"));
        assert!(!cast.is_culprit("oliver"));
        assert!(!cast.is_culprit("lucy"));
    }
}
