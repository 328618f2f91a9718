use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::advisor::SuggestionProvider;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

fn advisor(state: &AppState) -> Result<Arc<dyn SuggestionProvider>, AppError> {
    state.advisor.clone().ok_or(AppError::AiDisabled)
}

/// POST /api/v1/advice/summary
pub async fn handle_suggest_summary(
    State(state): State<AppState>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let advisor = advisor(&state)?;
    let doc = state.store.current();
    let suggestions = advisor.suggest_summary(&doc).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}

/// POST /api/v1/advice/bullets/:id
pub async fn handle_suggest_bullets(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let advisor = advisor(&state)?;
    let doc = state.store.current();
    let experience = doc
        .work_experience
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Work experience {id} not found")))?;
    let suggestions = advisor.suggest_bullets(experience, &doc).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}
