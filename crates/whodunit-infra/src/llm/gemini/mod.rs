//! GeminiProvider -- concrete [`LlmProvider`] implementation for the Google
//! Generative Language API.
//!
//! Posts to `{base_url}{model}:generateContent` with the API key as a query
//! parameter (the Gemini convention) and extracts the completion from the
//! first candidate's first part. One HTTP call per invocation; no retries.

pub mod types;

use secrecy::{ExposeSecret, SecretString};

use whodunit_core::llm::LlmProvider;
use whodunit_types::llm::{LlmError, ProviderReply, ReplyMode};

use self::types::{
    GeminiContent, GeminiErrorEnvelope, GeminiPart, GeminiRequest, GeminiResponse,
    GenerationConfig,
};

use super::into_reply;

/// Upper bound on completion length.
const MAX_OUTPUT_TOKENS: u32 = 3000;

/// Gemini-shaped LLM provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

// GeminiProvider intentionally does NOT derive Debug: the request URL embeds
// the API key, so neither the provider nor the URL may reach logs.

impl GeminiProvider {
    pub fn new(api_key: SecretString, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models/".to_string(),
            model,
        }
    }

    /// Override the base URL (tests, regional endpoints).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.api_key.expose_secret()
        )
    }

    fn build_request(&self, prompt: &str, mode: ReplyMode) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: match mode {
                    ReplyMode::Structured => Some("application/json".to_string()),
                    ReplyMode::Text => None,
                },
            },
        }
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn invoke(&self, prompt: &str, mode: ReplyMode) -> Result<ProviderReply, LlmError> {
        let body = self.build_request(prompt, mode);

        let response = self
            .client
            .post(self.url())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        let raw = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorEnvelope>(&raw)
                .ok()
                .and_then(|envelope| envelope.error)
                .map(|error| error.message)
                .unwrap_or_else(|| format!("HTTP {status}: {raw}"));
            return Err(LlmError::Provider { message });
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&raw).map_err(|_| LlmError::MalformedResponse {
                raw: raw.clone(),
            })?;

        let content = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(LlmError::MalformedResponse { raw })?;

        into_reply(content, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_provider() -> GeminiProvider {
        GeminiProvider::new(
            SecretString::from("test-key-not-real"),
            "gemini-2.5-flash".to_string(),
        )
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(LlmProvider::name(&make_provider()), "gemini");
    }

    #[test]
    fn test_url_embeds_model_and_key() {
        let url = make_provider()
            .with_base_url("http://localhost:9999/models/".to_string())
            .url();
        assert_eq!(
            url,
            "http://localhost:9999/models/gemini-2.5-flash:generateContent?key=test-key-not-real"
        );
    }

    #[test]
    fn test_build_request_structured_mode() {
        let req = make_provider().build_request("full prompt", ReplyMode::Structured);
        assert_eq!(req.contents[0].parts[0].text, "full prompt");
        assert_eq!(
            req.generation_config.response_mime_type.as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn test_build_request_text_mode() {
        let req = make_provider().build_request("full prompt", ReplyMode::Text);
        assert!(req.generation_config.response_mime_type.is_none());
        assert_eq!(req.generation_config.max_output_tokens, MAX_OUTPUT_TOKENS);
    }
}
