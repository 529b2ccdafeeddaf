//! Gemini generateContent API types.
//!
//! Provider-specific request/response structures for the Google Generative
//! Language API. The request nests the prompt under `contents[].parts[]`
//! and the completion comes back at `candidates[0].content.parts[0].text`.

use serde::{Deserialize, Serialize};

/// Request body for `{model}:generateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

/// A text part; used in both requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    pub text: String,
}

/// Generation parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    /// `"application/json"` in structured mode; skipped otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// Successful response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponse {
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidate {
    pub content: GeminiCandidateContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiCandidateContent {
    pub parts: Vec<GeminiPart>,
}

/// Error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorEnvelope {
    pub error: Option<GeminiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiErrorBody {
    pub message: String,
}
