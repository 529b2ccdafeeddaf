//! LlmProvider trait definition.
//!
//! This is the abstraction both provider backends implement. Uses RPITIT
//! for `invoke`; the object-safe variant lives in [`super::box_provider`].

use whodunit_types::llm::{LlmError, ProviderReply, ReplyMode};

/// Trait for LLM provider backends (OpenAI-shaped, Gemini-shaped).
///
/// One invocation is one outbound HTTP call: no retries, no caching. In
/// [`ReplyMode::Structured`] the implementation must parse the completion
/// text as JSON and fail with [`LlmError::MalformedResponse`] (carrying the
/// raw text) when it does not parse.
///
/// Implementations live in whodunit-infra (e.g. `OpenAiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openai", "gemini").
    fn name(&self) -> &str;

    /// Send a fully rendered prompt and receive the normalized reply.
    fn invoke(
        &self,
        prompt: &str,
        mode: ReplyMode,
    ) -> impl std::future::Future<Output = Result<ProviderReply, LlmError>> + Send;
}
