//! OpenAiProvider -- concrete [`LlmProvider`] implementation for the
//! OpenAI-shaped chat-completions API.
//!
//! Sends the fully rendered prompt as a single system message and extracts
//! the completion from `choices[0].message.content`. One HTTP call per
//! invocation; no retries.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

pub mod types;

use secrecy::{ExposeSecret, SecretString};

use whodunit_core::llm::LlmProvider;
use whodunit_types::llm::{LlmError, ProviderReply, ReplyMode};

use self::types::{OpenAiErrorEnvelope, OpenAiMessage, OpenAiRequest, OpenAiResponse, ResponseFormat};

use super::into_reply;

/// Upper bound on completion length.
const MAX_COMPLETION_TOKENS: u32 = 2000;

/// OpenAI-shaped LLM provider.
///
/// The endpoint is the *full* chat-completions URL so a proxy can stand in
/// for the real API without path rewriting.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    model: String,
}

// OpenAiProvider intentionally does NOT derive Debug so the API key can
// never end up in logs or panic output.

impl OpenAiProvider {
    pub fn new(api_key: SecretString, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model,
        }
    }

    /// Override the endpoint (proxy deployments, tests).
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str, mode: ReplyMode) -> OpenAiRequest {
        OpenAiRequest {
            model: self.model.clone(),
            messages: vec![OpenAiMessage {
                role: "system".to_string(),
                content: prompt.to_string(),
            }],
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            response_format: match mode {
                ReplyMode::Structured => Some(ResponseFormat::json_object()),
                ReplyMode::Text => None,
            },
        }
    }
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn invoke(&self, prompt: &str, mode: ReplyMode) -> Result<ProviderReply, LlmError> {
        let body = self.build_request(prompt, mode);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        let raw = response.text().await.unwrap_or_default();

        if !status.is_success() {
            // Propagate the provider's own message when its error envelope
            // parses; otherwise fall back to the status line.
            let message = serde_json::from_str::<OpenAiErrorEnvelope>(&raw)
                .ok()
                .and_then(|envelope| envelope.error)
                .map(|error| error.message)
                .unwrap_or_else(|| format!("HTTP {status}: {raw}"));
            return Err(LlmError::Provider { message });
        }

        let parsed: OpenAiResponse =
            serde_json::from_str(&raw).map_err(|_| LlmError::MalformedResponse {
                raw: raw.clone(),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::MalformedResponse { raw })?;

        into_reply(content, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> OpenAiProvider {
        OpenAiProvider::new(
            SecretString::from("test-key-not-real"),
            "gpt-4o-mini".to_string(),
        )
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(LlmProvider::name(&make_provider()), "openai");
    }

    #[test]
    fn test_endpoint_override() {
        let provider = make_provider().with_endpoint("http://localhost:9999".to_string());
        assert_eq!(provider.endpoint, "http://localhost:9999");
    }

    #[test]
    fn test_build_request_text_mode() {
        let req = make_provider().build_request("full prompt", ReplyMode::Text);
        assert_eq!(req.model, "gpt-4o-mini");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[0].content, "full prompt");
        assert!(req.response_format.is_none());
    }

    #[test]
    fn test_build_request_structured_mode() {
        let req = make_provider().build_request("full prompt", ReplyMode::Structured);
        assert_eq!(
            req.response_format.unwrap().format_type,
            "json_object"
        );
    }
}
