//! Structured errors for the leadscout HTTP API.
//!
//! Every failure leaves the server as a JSON body `{error, details?}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Errors returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or empty required field. No network activity was attempted.
    #[error("INVALID_INPUT: {0}")]
    BadRequest(String),

    /// The pipeline could not produce a result.
    #[error("INTERNAL: {error}")]
    Internal { error: String, details: Option<String> },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// 500 with a caller-facing message and the underlying cause as details.
    pub fn internal(error: impl Into<String>, details: impl ToString) -> Self {
        ApiError::Internal { error: error.into(), details: Some(details.to_string()) }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(error) => {
                tracing::warn!("rejected request: {}", error);
                ErrorBody { error, details: None }
            }
            ApiError::Internal { error, details } => {
                tracing::error!("request failed: {} ({})", error, details.as_deref().unwrap_or("no details"));
                ErrorBody { error, details }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let (status, body) = body_json(ApiError::bad_request("No query provided")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "No query provided" }));
    }

    #[tokio::test]
    async fn test_internal_body_has_details() {
        let (status, body) = body_json(ApiError::internal("Failed to scrape the website", "timeout")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to scrape the website");
        assert_eq!(body["details"], "timeout");
    }
}
