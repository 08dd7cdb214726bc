//! LLM provider trait for generating answers

use async_trait::async_trait;
use crate::error::Result;

/// Trait for text generation from a filled prompt
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-1.5-flash)
/// - `OllamaLlm`: Local Ollama server
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
