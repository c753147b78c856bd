//! Generative model trait for prompt-to-text generation

use async_trait::async_trait;

use crate::error::Result;

/// Trait for prompt-driven text generation
///
/// Implementations:
/// - `GeminiModel`: Google Vertex AI (gemini-2.5-flash)
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate free-form text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with the response constrained to JSON.
    ///
    /// Returns the raw response text; callers parse it. Models that cannot
    /// constrain output may return fenced JSON, which callers must strip.
    async fn generate_json(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
