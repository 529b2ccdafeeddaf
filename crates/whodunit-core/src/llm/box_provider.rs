//! BoxLlmProvider -- object-safe dynamic dispatch wrapper for LlmProvider.
//!
//! 1. Define an object-safe `LlmProviderDyn` trait with boxed futures
//! 2. Blanket-impl `LlmProviderDyn` for all `T: LlmProvider`
//! 3. `BoxLlmProvider` wraps `Box<dyn LlmProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use whodunit_types::llm::{LlmError, ProviderReply, ReplyMode};

use super::provider::LlmProvider;

/// Object-safe version of [`LlmProvider`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn LlmProviderDyn`).
/// A blanket implementation is provided for all types implementing
/// `LlmProvider`.
pub trait LlmProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn invoke_boxed<'a>(
        &'a self,
        prompt: &'a str,
        mode: ReplyMode,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderReply, LlmError>> + Send + 'a>>;
}

/// Blanket implementation: any `LlmProvider` automatically implements
/// `LlmProviderDyn`.
impl<T: LlmProvider> LlmProviderDyn for T {
    fn name(&self) -> &str {
        LlmProvider::name(self)
    }

    fn invoke_boxed<'a>(
        &'a self,
        prompt: &'a str,
        mode: ReplyMode,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderReply, LlmError>> + Send + 'a>> {
        Box::pin(self.invoke(prompt, mode))
    }
}

/// Type-erased LLM provider for runtime provider selection.
///
/// Since `LlmProvider` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxLlmProvider` provides equivalent methods that delegate to
/// the inner `LlmProviderDyn` trait object, letting configuration pick
/// OpenAI or Gemini once at startup.
pub struct BoxLlmProvider {
    inner: Box<dyn LlmProviderDyn + Send + Sync>,
}

impl BoxLlmProvider {
    /// Wrap a concrete `LlmProvider` in a type-erased box.
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    /// Human-readable provider name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send a fully rendered prompt and receive the normalized reply.
    pub async fn invoke(
        &self,
        prompt: &str,
        mode: ReplyMode,
    ) -> Result<ProviderReply, LlmError> {
        self.inner.invoke_boxed(prompt, mode).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(
            &self,
            prompt: &str,
            mode: ReplyMode,
        ) -> Result<ProviderReply, LlmError> {
            match mode {
                ReplyMode::Text => Ok(ProviderReply::Text(prompt.to_string())),
                ReplyMode::Structured => Ok(ProviderReply::Structured(
                    serde_json::json!({"reply": prompt}),
                )),
            }
        }
    }

    #[tokio::test]
    async fn test_boxed_provider_delegates() {
        let boxed = BoxLlmProvider::new(EchoProvider);
        assert_eq!(boxed.name(), "echo");

        let reply = boxed.invoke("hello", ReplyMode::Text).await.unwrap();
        assert_eq!(reply, ProviderReply::Text("hello".to_string()));

        let reply = boxed.invoke("hello", ReplyMode::Structured).await.unwrap();
        assert_eq!(reply.chat_text().unwrap(), "hello");
    }
}
