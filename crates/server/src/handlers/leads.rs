use axum::Json;
use axum::extract::State;

use super::AppState;
use crate::error::ApiError;
use crate::pipelines::Tagged;
use crate::types::{JsonBody, LeadsBody, SubjectsRequest, required_subjects};

/// Keyword search over stored leads.
pub async fn search_leads(
    State(state): State<AppState>, JsonBody(request): JsonBody<SubjectsRequest>,
) -> Result<Json<Tagged<LeadsBody>>, ApiError> {
    let subjects = required_subjects(request.subjects, "No subjects provided")?;

    let leads = state
        .leads
        .search(&subjects)
        .await
        .map_err(|e| ApiError::internal("Failed to search leads", e))?;

    tracing::info!("{} leads for {} keywords", leads.len(), subjects.len());
    Ok(Json(Tagged::genuine(LeadsBody { leads })))
}
