//! LLM client error types.

use std::sync::Arc;

/// Errors from the chat completion collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// No API key configured.
    #[error("missing API key: LEADSCOUT_LLM_API_KEY not set")]
    MissingApiKey,

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Non-2xx response from the completion endpoint.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Response body did not have the chat completion shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The completion had no choices or empty content.
    #[error("empty completion")]
    EmptyCompletion,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { LlmError::Timeout } else { LlmError::Network(Arc::new(err)) }
    }
}
