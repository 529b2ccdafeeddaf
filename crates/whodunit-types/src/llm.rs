//! LLM provider types: reply shapes, invocation modes, and error taxonomy.
//!
//! The game talks to exactly one of two provider backends, selected by
//! static configuration. Both are normalized into [`ProviderReply`], which
//! carries either free text or a parsed JSON value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use std::fmt;
use std::str::FromStr;

/// Which provider backend handles outbound completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(format!("invalid provider: '{other}'")),
        }
    }
}

/// How the caller wants the provider's completion interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// Return the completion text as-is.
    Text,
    /// Request and parse a machine-readable (JSON) completion.
    Structured,
}

/// A normalized provider completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderReply {
    /// Free-text completion.
    Text(String),
    /// Parsed JSON completion from a structured-mode invocation.
    Structured(Value),
}

impl ProviderReply {
    /// Extract the in-character chat reply.
    ///
    /// Structured chat completions are expected to carry a `"reply"` string
    /// field (the chat template instructs the model to produce one); a
    /// one-field object with a string value is accepted as equivalent.
    pub fn chat_text(&self) -> Result<String, LlmError> {
        match self {
            ProviderReply::Text(text) => Ok(text.clone()),
            ProviderReply::Structured(Value::Object(map)) => {
                if let Some(Value::String(reply)) = map.get("reply") {
                    return Ok(reply.clone());
                }
                if map.len() == 1 {
                    if let Some(Value::String(only)) = map.values().next() {
                        return Ok(only.clone());
                    }
                }
                Err(LlmError::MalformedResponse {
                    raw: Value::Object(map.clone()).to_string(),
                })
            }
            ProviderReply::Structured(other) => Err(LlmError::MalformedResponse {
                raw: other.to_string(),
            }),
        }
    }

    /// Extract the verdict narrative from a deduction completion.
    ///
    /// A one-field object unwraps to its single value; otherwise a `"reply"`
    /// string field wins; otherwise the value is serialized as-is. This never
    /// fails -- a surprising shape degrades to its JSON text.
    pub fn narrative_text(&self) -> String {
        match self {
            ProviderReply::Text(text) => text.clone(),
            ProviderReply::Structured(Value::String(s)) => s.clone(),
            ProviderReply::Structured(Value::Object(map)) => {
                if map.len() == 1 {
                    return match map.values().next() {
                        Some(Value::String(s)) => s.clone(),
                        Some(other) => other.to_string(),
                        None => String::new(),
                    };
                }
                if let Some(Value::String(reply)) = map.get("reply") {
                    return reply.clone();
                }
                Value::Object(map.clone()).to_string()
            }
            ProviderReply::Structured(other) => other.to_string(),
        }
    }

    /// Extract the first array-valued field of a structured completion.
    pub fn first_array(&self) -> Result<Vec<Value>, LlmError> {
        if let ProviderReply::Structured(Value::Object(map)) = self {
            if let Some(Value::Array(items)) = map.values().find(|v| v.is_array()) {
                return Ok(items.clone());
            }
        }
        let raw = match self {
            ProviderReply::Text(text) => text.clone(),
            ProviderReply::Structured(value) => value.to_string(),
        };
        Err(LlmError::MalformedResponse { raw })
    }
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Startup-time misconfiguration (missing API key, bad selection).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Non-success HTTP status or transport failure. Single attempt only;
    /// never retried.
    #[error("provider error: {message}")]
    Provider { message: String },

    /// A structured-mode completion that could not be interpreted. Carries
    /// the raw text for diagnostics.
    #[error("malformed provider response: {raw}")]
    MalformedResponse { raw: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_kind_roundtrip() {
        for kind in [ProviderKind::OpenAi, ProviderKind::Gemini] {
            let s = kind.to_string();
            let parsed: ProviderKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_provider_kind_serde() {
        let kind = ProviderKind::OpenAi;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"openai\"");
        let parsed: ProviderKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ProviderKind::OpenAi);
    }

    #[test]
    fn test_chat_text_from_text_reply() {
        let reply = ProviderReply::Text("I was asleep.".to_string());
        assert_eq!(reply.chat_text().unwrap(), "I was asleep.");
    }

    #[test]
    fn test_chat_text_from_reply_field() {
        let reply = ProviderReply::Structured(json!({"reply": "I was asleep."}));
        assert_eq!(reply.chat_text().unwrap(), "I was asleep.");
    }

    #[test]
    fn test_chat_text_from_single_field_object() {
        let reply = ProviderReply::Structured(json!({"answer": "In the study."}));
        assert_eq!(reply.chat_text().unwrap(), "In the study.");
    }

    #[test]
    fn test_chat_text_rejects_unusable_shape() {
        let reply = ProviderReply::Structured(json!({"a": 1, "b": 2}));
        let err = reply.chat_text().unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse { .. }));
    }

    #[test]
    fn test_narrative_text_unwraps_single_field() {
        let reply = ProviderReply::Structured(json!({"verdict": "You solved it."}));
        assert_eq!(reply.narrative_text(), "You solved it.");
    }

    #[test]
    fn test_narrative_text_prefers_reply_field() {
        let reply = ProviderReply::Structured(json!({
            "reply": "The watch was wound back.",
            "confidence": "high"
        }));
        assert_eq!(reply.narrative_text(), "The watch was wound back.");
    }

    #[test]
    fn test_narrative_text_never_fails() {
        let reply = ProviderReply::Structured(json!({"a": 1, "b": 2}));
        let text = reply.narrative_text();
        assert!(text.contains("\"a\""));
    }

    #[test]
    fn test_first_array_finds_array_field() {
        let reply = ProviderReply::Structured(json!({
            "title": "clues",
            "items": ["watch", "scream", "rope"]
        }));
        let items = reply.first_array().unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_first_array_rejects_arrayless_object() {
        let reply = ProviderReply::Structured(json!({"title": "clues"}));
        let err = reply.first_array().unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse { .. }));
    }

    #[test]
    fn test_llm_error_display_carries_raw_text() {
        let err = LlmError::MalformedResponse {
            raw: "not json at all".to_string(),
        };
        assert!(err.to_string().contains("not json at all"));
    }
}
