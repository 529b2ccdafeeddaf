//! Concrete LLM provider adapters.
//!
//! One adapter per provider shape, both implementing
//! [`whodunit_core::llm::LlmProvider`] over plain `reqwest` with typed
//! request/response envelopes. Exactly one adapter is constructed at
//! startup, selected by configuration.

pub mod gemini;
pub mod openai;

use secrecy::SecretString;

use whodunit_core::llm::BoxLlmProvider;
use whodunit_types::llm::{LlmError, ProviderKind, ProviderReply, ReplyMode};

use crate::config::AppConfig;

use self::gemini::GeminiProvider;
use self::openai::OpenAiProvider;

/// Construct the configured provider behind dynamic dispatch.
pub fn build_provider(config: &AppConfig, api_key: SecretString) -> BoxLlmProvider {
    match config.provider {
        ProviderKind::OpenAi => BoxLlmProvider::new(
            OpenAiProvider::new(api_key, config.model.clone())
                .with_endpoint(config.openai.endpoint.clone()),
        ),
        ProviderKind::Gemini => BoxLlmProvider::new(
            GeminiProvider::new(api_key, config.model.clone())
                .with_base_url(config.gemini.base_url.clone()),
        ),
    }
}

/// Interpret extracted completion text according to the invocation mode.
///
/// Shared by both adapters: structured mode parses the text as JSON and
/// keeps the raw text in the error for diagnostics.
pub(crate) fn into_reply(text: String, mode: ReplyMode) -> Result<ProviderReply, LlmError> {
    match mode {
        ReplyMode::Text => Ok(ProviderReply::Text(text)),
        ReplyMode::Structured => match serde_json::from_str(&text) {
            Ok(value) => Ok(ProviderReply::Structured(value)),
            Err(_) => Err(LlmError::MalformedResponse { raw: text }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_reply_text_mode_passes_through() {
        let reply = into_reply("not json".to_string(), ReplyMode::Text).unwrap();
        assert_eq!(reply, ProviderReply::Text("not json".to_string()));
    }

    #[test]
    fn test_into_reply_structured_mode_parses_json() {
        let reply =
            into_reply(r#"{"reply": "hello"}"#.to_string(), ReplyMode::Structured).unwrap();
        assert_eq!(reply.chat_text().unwrap(), "hello");
    }

    #[test]
    fn test_into_reply_structured_mode_keeps_raw_on_failure() {
        let err = into_reply("oops, prose".to_string(), ReplyMode::Structured).unwrap_err();
        match err {
            LlmError::MalformedResponse { raw } => assert_eq!(raw, "oops, prose"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
