//! Generic passthrough handler.
//!
//! Substitutes arbitrary caller-supplied variables into a prompt (the
//! caller's own, or the chat template) and returns whatever array-shaped
//! field the provider's structured reply contains. The unescaped
//! substitution is a known prompt-injection surface, preserved as designed.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use whodunit_core::prompt::template::{render_str, VarMap};
use whodunit_types::llm::ReplyMode;

use crate::http::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for the passthrough endpoint.
///
/// Every field beyond `prompt` and `title` becomes a template variable.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Prompt text to render; the chat template when omitted.
    pub prompt: Option<String>,
    /// Echoed back in the response.
    pub title: Option<String>,
    #[serde(flatten)]
    pub variables: HashMap<String, Value>,
}

/// Response body for the passthrough endpoint.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub title: String,
    pub data: Vec<Value>,
}

/// Template-variable text for a JSON value: strings verbatim, everything
/// else serialized.
fn variable_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/ - Render an arbitrary prompt and return its array payload.
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request_id = Uuid::now_v7();

    let vars: VarMap = body
        .variables
        .iter()
        .map(|(key, value)| (key.clone(), variable_text(value)))
        .collect();

    let prompt = match &body.prompt {
        Some(prompt) => render_str(prompt, &vars),
        None => state.templates.chat.render(&vars),
    };

    tracing::debug!(
        request_id = %request_id,
        variables = vars.len(),
        has_prompt = body.prompt.is_some(),
        "passthrough generation"
    );

    let data = state
        .provider
        .invoke(&prompt, ReplyMode::Structured)
        .await?
        .first_array()?;

    Ok(Json(GenerateResponse {
        title: body
            .title
            .unwrap_or_else(|| "Generated Content".to_string()),
        data,
    }))
}
