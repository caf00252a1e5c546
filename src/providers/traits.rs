use async_trait::async_trait;
use std::any::Any;
use anyhow::Result;

/// Narrow chat-completion client injected into the assistant.
///
/// Implementations own their credentials; callers only hand over the
/// prompts and receive reply text or an error.
#[async_trait]
pub trait CompletionProvider: Any + Send + Sync {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String>;

    async fn get_model_info(&self) -> Result<String>;

    fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync>;
}

impl Clone for Box<dyn CompletionProvider + Send + Sync> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
