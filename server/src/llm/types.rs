//! Shared LLM types: the chat trait, reply record, and error taxonomy.

/// Error from LLM configuration or API calls.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("missing API key for model {model}")]
    MissingApiKey { model: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClientBuild(String),
    #[error("API request failed: {0}")]
    ApiRequest(String),
    #[error("API returned status {status}: {body}")]
    ApiResponse { status: u16, body: String },
    #[error("unexpected API response shape: {0}")]
    ResponseParse(String),
}

/// One model's answer to a single question.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelReply {
    /// Assistant message text.
    pub text: String,
    /// Total tokens billed for the exchange.
    pub tokens: i64,
    /// Wall-clock request latency in seconds.
    pub latency_secs: f64,
}

/// Chat abstraction implemented by provider clients and test mocks.
#[async_trait::async_trait]
pub trait ChatModel: Send + Sync {
    /// The model identifier requests are issued for.
    fn model(&self) -> &str;

    /// Send one system + user exchange and return the reply.
    async fn chat(&self, system: &str, user: &str) -> Result<ModelReply, LlmError>;
}
