//! OpenAI chat-completions API types.
//!
//! Provider-specific request/response structures used for HTTP communication
//! with the OpenAI endpoint (or a proxy for it). They are NOT the generic
//! reply types from whodunit-types -- those are provider-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for the chat-completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiRequest {
    pub model: String,
    pub messages: Vec<OpenAiMessage>,
    pub max_completion_tokens: u32,
    /// Present only in structured mode; constrains the completion to a JSON
    /// object. Skipped when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// A single message in an OpenAI conversation.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiMessage {
    pub role: String,
    pub content: String,
}

/// The `response_format` request field.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Successful response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiResponse {
    pub choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoice {
    pub message: OpenAiChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoiceMessage {
    pub content: String,
}

/// Error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiErrorEnvelope {
    pub error: Option<OpenAiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_text_mode() {
        let req = OpenAiRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![OpenAiMessage {
                role: "system".to_string(),
                content: "You play Emilia Sandra.".to_string(),
            }],
            max_completion_tokens: 2000,
            response_format: None,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_completion_tokens"], 2000);
        // response_format should not appear when None
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn test_request_serialization_structured_mode() {
        let req = OpenAiRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![],
            max_completion_tokens: 2000,
            response_format: Some(ResponseFormat::json_object()),
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-123",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "I was in the garden."}}
            ]
        }"#;
        let resp: OpenAiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].message.content, "I was in the garden.");
    }

    #[test]
    fn test_error_envelope_deserialization() {
        let json = r#"{"error": {"message": "Invalid API key", "type": "invalid_request_error"}}"#;
        let envelope: OpenAiErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.unwrap().message, "Invalid API key");
    }
}
