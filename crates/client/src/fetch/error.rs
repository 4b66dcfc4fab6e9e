//! Page fetch error types.

use std::sync::Arc;

/// Errors from a single page fetch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The caller-supplied timeout elapsed.
    #[error("request timeout")]
    Timeout,

    /// DNS failure, refused connection, TLS error, or a broken body stream.
    #[error("network error: {0}")]
    Network(String),

    /// Response body exceeded the configured byte ceiling.
    #[error("response too large: {0} bytes exceeds {1}")]
    TooLarge(usize, usize),

    /// The target could not be parsed as a URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("client build failed: {0}")]
    Client(Arc<reqwest::Error>),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_builder() {
            FetchError::InvalidUrl(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(FetchError::Timeout.to_string(), "request timeout");

        let err = FetchError::Network("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));

        let err = FetchError::TooLarge(10, 5);
        assert!(err.to_string().contains("10 bytes exceeds 5"));
    }
}
