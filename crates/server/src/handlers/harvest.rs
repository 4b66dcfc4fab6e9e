//! Harvest pipeline endpoints.

use axum::Json;
use axum::extract::State;

use super::AppState;
use crate::error::ApiError;
use crate::pipelines::{AnalyzeBody, BacklinksBody, CrawlBody, RelatedBody, ScrapeBody, Tagged};
use crate::types::{
    ArticleRequest, JsonBody, QueryRequest, SubjectsRequest, UrlRequest, required_subjects, required_text,
};

pub async fn analyze(
    State(state): State<AppState>, JsonBody(request): JsonBody<ArticleRequest>,
) -> Result<Json<Tagged<AnalyzeBody>>, ApiError> {
    let article = required_text(&request.article, "No article provided")?;

    let result = state
        .pipelines
        .analyze(&article)
        .await
        .map_err(|e| ApiError::internal("Failed to analyze article using AI", e))?;
    Ok(Json(result))
}

pub async fn backlinks(
    State(state): State<AppState>, JsonBody(request): JsonBody<SubjectsRequest>,
) -> Result<Json<Tagged<BacklinksBody>>, ApiError> {
    let subjects = required_subjects(request.subjects, "No subjects provided for backlink opportunities")?;
    Ok(Json(state.pipelines.backlinks(&subjects).await))
}

pub async fn scrape(
    State(state): State<AppState>, JsonBody(request): JsonBody<UrlRequest>,
) -> Result<Json<Tagged<ScrapeBody>>, ApiError> {
    let url = required_text(&request.url, "No URL provided")?;

    match state.pipelines.scrape(&url).await {
        Some(body) => Ok(Json(Tagged::genuine(body))),
        None => Err(ApiError::internal("Failed to scrape the website", format!("{url} could not be fetched"))),
    }
}

pub async fn crawl(
    State(state): State<AppState>, JsonBody(request): JsonBody<QueryRequest>,
) -> Result<Json<Tagged<CrawlBody>>, ApiError> {
    let query = required_text(&request.query, "No query provided")?;
    Ok(Json(Tagged::genuine(state.pipelines.crawl(&query).await)))
}

pub async fn related_websites(
    State(state): State<AppState>, JsonBody(request): JsonBody<SubjectsRequest>,
) -> Result<Json<Tagged<RelatedBody>>, ApiError> {
    let subjects = required_subjects(request.subjects, "No subjects provided")?;

    let body = state
        .pipelines
        .related(&subjects)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch related websites.", e))?;
    Ok(Json(Tagged::genuine(body)))
}
