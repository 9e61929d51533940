//! LLM backend trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for LLM backends
///
/// Implementations of this trait provide access to different LLM services
/// (e.g., OpenAI, Anthropic, Google).
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a completion from the LLM
    ///
    /// # Arguments
    ///
    /// * `request` - The completion request with messages and parameters
    ///
    /// # Returns
    ///
    /// The completion response with the assistant's text and token usage
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the backend name (e.g., "openai", "anthropic")
    fn name(&self) -> &str;
}
