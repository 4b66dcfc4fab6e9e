//! Request and response bodies for the HTTP API.
//!
//! Request fields are read leniently: a missing, null or mistyped field is
//! treated as empty so the handler can answer with its own 400 message.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use leadscout_core::Lead;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// JSON request body that only rejects unparseable JSON.
///
/// A request without a JSON content type or without a body yields
/// `T::default()`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("json"));
        if !is_json {
            return Ok(JsonBody(T::default()));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Unreadable request body: {e}")))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::bad_request(format!("Malformed JSON body: {e}")))
    }
}

/// A string field; anything else reads as empty.
fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// The string items of an array field; a non-array reads as empty.
fn de_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        _ => Ok(Vec::new()),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleRequest {
    #[serde(default, deserialize_with = "de_text")]
    pub article: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectsRequest {
    #[serde(default, deserialize_with = "de_string_list")]
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlRequest {
    #[serde(default, deserialize_with = "de_text")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default, deserialize_with = "de_text")]
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadsBody {
    pub leads: Vec<Lead>,
}

/// Trimmed `value`, or a 400 with `message` when nothing is left.
pub fn required_text(value: &str, message: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() { Err(ApiError::bad_request(message)) } else { Ok(value.to_string()) }
}

/// Trimmed non-blank subjects, or a 400 with `message` when none remain.
pub fn required_subjects(subjects: Vec<String>, message: &str) -> Result<Vec<String>, ApiError> {
    let subjects: Vec<String> = subjects
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if subjects.is_empty() { Err(ApiError::bad_request(message)) } else { Ok(subjects) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("  hello \n", "missing").unwrap(), "hello");
        assert!(matches!(required_text(" \t ", "missing"), Err(ApiError::BadRequest(m)) if m == "missing"));
    }

    #[test]
    fn test_required_subjects_drops_blanks() {
        let subjects = vec![" seo ".to_string(), "".to_string(), "  ".to_string(), "ppc".to_string()];
        assert_eq!(required_subjects(subjects, "missing").unwrap(), vec!["seo", "ppc"]);
        assert!(required_subjects(vec!["   ".to_string()], "missing").is_err());
        assert!(required_subjects(Vec::new(), "missing").is_err());
    }

    #[test]
    fn test_missing_fields_default() {
        let req: SubjectsRequest = serde_json::from_str("{}").unwrap();
        assert!(req.subjects.is_empty());

        let req: ArticleRequest = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert!(req.article.is_empty());
    }

    #[test]
    fn test_null_and_mistyped_fields_read_as_empty() {
        for body in [r#"{"subjects": null}"#, r#"{"subjects": "seo"}"#, r#"{"subjects": {"a": 1}}"#] {
            let req: SubjectsRequest = serde_json::from_str(body).unwrap();
            assert!(req.subjects.is_empty(), "{body}");
        }

        let req: SubjectsRequest = serde_json::from_str(r#"{"subjects": ["seo", 3, null, "ppc"]}"#).unwrap();
        assert_eq!(req.subjects, vec!["seo", "ppc"]);

        let req: UrlRequest = serde_json::from_str(r#"{"url": null}"#).unwrap();
        assert!(req.url.is_empty());
        let req: QueryRequest = serde_json::from_str(r#"{"query": 42}"#).unwrap();
        assert!(req.query.is_empty());
    }
}
