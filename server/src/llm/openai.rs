//! OpenAI-compatible chat-completions client.
//!
//! Serves both OpenAI and DeepSeek: the wire format is identical, only the
//! base URL and key differ. Response parsing is split into pure functions so
//! malformed-payload handling is testable without a network.

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::types::{ChatModel, LlmError, ModelReply};

const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_COMPLETION_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.7;

pub struct OpenAiCompatClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompatClient {
    /// Build a client for one provider endpoint and model.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(api_key: String, base_url: &str, model: String) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_owned();
        Ok(Self { http, api_key, base_url, model })
    }
}

#[async_trait::async_trait]
impl ChatModel for OpenAiCompatClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, system: &str, user: &str) -> Result<ModelReply, LlmError> {
        let body = CcRequest {
            model: &self.model,
            messages: vec![
                CcMessage { role: "system", content: system },
                CcMessage { role: "user", content: user },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let started = Instant::now();
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;
        let latency_secs = started.elapsed().as_secs_f64();

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_chat_completion(&text, latency_secs)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    messages: Vec<CcMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct CcMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CcResponse {
    choices: Vec<CcChoice>,
    #[serde(default)]
    usage: Option<CcUsage>,
}

#[derive(Deserialize)]
struct CcChoice {
    message: CcResponseMessage,
}

#[derive(Deserialize)]
struct CcResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct CcUsage {
    #[serde(default)]
    total_tokens: i64,
}

/// Parse a chat-completions response body into a [`ModelReply`].
///
/// # Errors
///
/// Returns [`LlmError::ResponseParse`] when the body is not valid JSON or has
/// no choices.
pub(super) fn parse_chat_completion(body: &str, latency_secs: f64) -> Result<ModelReply, LlmError> {
    let parsed: CcResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ResponseParse(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::ResponseParse("response has no choices".to_owned()))?;

    Ok(ModelReply {
        text: choice.message.content.unwrap_or_default(),
        tokens: parsed.usage.map_or(0, |u| u.total_tokens),
        latency_secs,
    })
}
