//! LLM provider trait for generating answers

use async_trait::async_trait;
use crate::error::Result;

/// Trait for LLM-based text completion
///
/// Implementations:
/// - `GroqLlm`: Groq chat completions (llama3-70b-8192)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a fully rendered prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get the model being used
    fn model(&self) -> &str;
}
