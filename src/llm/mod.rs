//! Language-model integration.
//!
//! Only one capability is needed by the core: turn a system prompt and a
//! block of user text into a completion. [`LlmProvider`] is that seam;
//! [`OpenAiChatProvider`] is the production implementation.

mod openai;
mod provider;
mod retry;

pub use openai::OpenAiChatProvider;
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider, Role,
};

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::LlmError;

/// Create the configured LLM provider.
pub fn create_llm_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    tracing::info!(model = %config.model, "Using OpenAI chat completions");
    Ok(Arc::new(OpenAiChatProvider::new(config.clone())?))
}
