//! LLM — chat clients for the two evaluation sides.
//!
//! DESIGN
//! ======
//! Evaluation requests carry their own provider API keys, so clients are
//! built per request rather than once at startup. Both configured providers
//! speak the OpenAI chat-completions wire format; DeepSeek differs only in
//! base URL and key. The [`ChatModel`] trait is the seam tests mock.

pub mod openai;
pub mod types;

use std::sync::Arc;

pub use types::{ChatModel, LlmError, ModelReply};

use crate::llm::openai::OpenAiCompatClient;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Base URL for the provider that serves `model`.
#[must_use]
pub fn provider_base_url(model: &str) -> &'static str {
    if model.starts_with("deepseek") {
        DEEPSEEK_BASE_URL
    } else {
        OPENAI_BASE_URL
    }
}

/// Build a chat client for `model` using the matching provider key.
///
/// # Errors
///
/// Returns [`LlmError::MissingApiKey`] when the matching key is empty and
/// [`LlmError::HttpClientBuild`] if the HTTP client cannot be constructed.
pub fn build_model_client(
    model: &str,
    openai_key: &str,
    deepseek_key: &str,
) -> Result<Arc<dyn ChatModel>, LlmError> {
    let (base_url, key) = if model.starts_with("deepseek") {
        (DEEPSEEK_BASE_URL, deepseek_key)
    } else {
        (OPENAI_BASE_URL, openai_key)
    };

    if key.trim().is_empty() {
        return Err(LlmError::MissingApiKey { model: model.to_owned() });
    }

    let client = OpenAiCompatClient::new(key.trim().to_owned(), base_url, model.to_owned())?;
    Ok(Arc::new(client))
}
