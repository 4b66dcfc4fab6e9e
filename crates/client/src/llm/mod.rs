//! Chat-completion collaborator for theme and website suggestion.
//!
//! ### Protocol
//!
//! - **Endpoint**: any OpenAI-compatible `/v1/chat/completions` (default: Hyperbolic)
//! - **Authentication**: `Authorization: Bearer <key>`; the key is only checked when a call is made
//! - **Sampling**: temperature 0.1, top_p 0.9, no streaming
//! - **Output**: `choices[0].message.content`, parsed by [`themes`]

pub mod error;
pub mod themes;

pub use error::LlmError;
pub use themes::{parse_subjects, parse_websites, themes_prompt, websites_prompt};

use async_trait::async_trait;
use leadscout_core::AppConfig;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default completion endpoint.
pub const DEFAULT_API_URL: &str = "https://api.hyperbolic.xyz/v1/chat/completions";

/// Default model.
pub const DEFAULT_MODEL: &str = "deepseek-ai/DeepSeek-V3";

const TEMPERATURE: f32 = 0.1;
const TOP_P: f32 = 0.9;

/// Free-text completion source.
#[async_trait]
pub trait Suggester: Send + Sync {
    /// Complete `prompt`, spending at most `max_tokens`.
    async fn suggest(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;
}

/// Ask for an article's themes and parse them into subjects.
pub async fn suggest_subjects(suggester: &dyn Suggester, article: &str) -> Result<Vec<String>, LlmError> {
    let text = suggester.suggest(&themes_prompt(article), themes::THEMES_MAX_TOKENS).await?;
    let subjects = parse_subjects(&text);
    tracing::info!("model suggested {} subjects", subjects.len());
    Ok(subjects)
}

/// Ask for sites relevant to `subjects` and parse them into schemed URLs, at most `max`.
pub async fn suggest_websites(
    suggester: &dyn Suggester, subjects: &[String], max: usize,
) -> Result<Vec<String>, LlmError> {
    let text = suggester.suggest(&websites_prompt(subjects), themes::WEBSITES_MAX_TOKENS).await?;
    let websites = parse_websites(&text, max);
    tracing::info!("model suggested {} websites", websites.len());
    Ok(websites)
}

/// Chat client configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(100),
        }
    }
}

impl From<&AppConfig> for ChatConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_url: config.llm_api_url.clone(),
            api_key: config.llm_api_key.clone().filter(|k| !k.trim().is_empty()),
            model: config.llm_model.clone(),
            timeout: config.llm_timeout(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 1],
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// OpenAI-compatible chat completion client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| LlmError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        Self::new(ChatConfig::from(config))
    }

    fn headers(&self) -> Result<HeaderMap, LlmError> {
        let key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let mut headers = HeaderMap::new();
        let bearer =
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| LlmError::Parse(format!("api key: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl Suggester for ChatClient {
    async fn suggest(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let headers = self.headers()?;
        let request = ChatRequest {
            messages: [ChatMessage { role: "user", content: prompt }],
            model: &self.config.model,
            max_tokens,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            stream: false,
        };

        let start = Instant::now();
        tracing::debug!("chat completion request: model={} max_tokens={}", self.config.model, max_tokens);

        let response = self
            .http
            .post(&self.config.api_url)
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("chat completion failed ({}): {}", status, body);
            return Err(LlmError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes).map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        tracing::debug!("chat completion in {:?} ({} chars)", start.elapsed(), content.len());
        Ok(content)
    }
}
