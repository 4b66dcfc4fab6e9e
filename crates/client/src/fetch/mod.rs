//! HTTP page fetcher with a fixed browser identity.
//!
//! ### Identity
//! - Desktop browser User-Agent and `Accept-Language` on every request.
//! - Not configurable per call, only per client.
//!
//! ### Timeouts
//! - Each call carries its own timeout; expiry surfaces as [`FetchError::Timeout`].
//! - A timed-out call never affects sibling calls.
//!
//! ### Status handling
//! - Any HTTP status is returned to the caller; only transport failures are errors.
//!   Callers decide what counts as success (content fetches want 2xx, liveness
//!   checks accept [200, 400)).
//! - Redirects are followed (max 10).
//! - Max body bytes: 5MB (configurable)

pub mod error;
pub mod url;

use async_trait::async_trait;
use leadscout_core::AppConfig;
use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use error::FetchError;
pub use url::{ensure_scheme, has_scheme, normalize, unwrap_redirect};

/// HTTP method used by a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Accept-Language header (default: "en-US,en;q=0.9")
    pub accept_language: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: leadscout_core::config::BROWSER_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            max_bytes: 5 * 1024 * 1024,
            max_redirects: 10,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
            max_bytes: config.max_bytes,
            ..Default::default()
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: String,
    /// The final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body, lossily decoded as UTF-8 (empty for HEAD)
    pub body: String,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status in [200, 400), the liveness criterion.
    pub fn is_live(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// A single bounded-timeout HTTP request.
///
/// The seam between the harvesting pipeline and the network; tests swap in
/// scripted implementations.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, method: Method, timeout: Duration) -> Result<FetchResponse, FetchError>;
}

/// reqwest-backed [`Fetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut default_headers = header::HeaderMap::new();
        if let Ok(value) = header::HeaderValue::from_str(&config.accept_language) {
            default_headers.insert(header::ACCEPT_LANGUAGE, value);
        }

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(default_headers)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| FetchError::Client(std::sync::Arc::new(e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, method: Method, timeout: Duration) -> Result<FetchResponse, FetchError> {
        let start = Instant::now();
        let target = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let response = self
            .http
            .request(method.as_reqwest(), target)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        // Only a GET body is read.
        if method == Method::Get
            && let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(FetchError::TooLarge(len as usize, self.config.max_bytes));
        }

        let body = match method {
            Method::Head => String::new(),
            Method::Get => {
                let bytes = response.bytes().await?;
                if bytes.len() > self.config.max_bytes {
                    return Err(FetchError::TooLarge(bytes.len(), self.config.max_bytes));
                }
                String::from_utf8_lossy(&bytes).into_owned()
            }
        };

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "{:?} {} -> {} status {} in {}ms ({} bytes)",
            method,
            url,
            final_url,
            status,
            fetch_ms,
            body.len()
        );

        Ok(FetchResponse { url: url.to_string(), final_url, status, body, fetch_ms })
    }
}
