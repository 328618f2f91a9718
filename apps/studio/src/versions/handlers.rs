use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::editor::store::EditorView;
use crate::errors::AppError;
use crate::state::AppState;
use crate::versions::archive::{VersionSnapshot, VersionSummary};

#[derive(Deserialize)]
pub struct SaveVersionBody {
    #[serde(default)]
    pub label: Option<String>,
}

/// GET /api/v1/versions
pub async fn handle_list_versions(State(state): State<AppState>) -> Json<Vec<VersionSummary>> {
    Json(state.archive.summaries().await)
}

/// POST /api/v1/versions
/// Snapshots the current document. A failed write leaves the list untouched.
pub async fn handle_save_version(
    State(state): State<AppState>,
    body: Option<Json<SaveVersionBody>>,
) -> Result<(StatusCode, Json<VersionSummary>), AppError> {
    let label = body.and_then(|Json(b)| b.label);
    let doc = state.store.current();
    let snapshot = state.archive.save(&doc, label.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(VersionSummary::from(&snapshot))))
}

/// GET /api/v1/versions/:id
pub async fn handle_get_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VersionSnapshot>, AppError> {
    state
        .archive
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Version {id} not found")))
}

/// DELETE /api/v1/versions/:id
/// Deleting an unknown id is a no-op.
pub async fn handle_delete_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<VersionSummary>>, AppError> {
    state.archive.delete(&id).await?;
    Ok(Json(state.archive.summaries().await))
}

/// POST /api/v1/versions/:id/restore
pub async fn handle_restore_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditorView>, AppError> {
    let doc = state
        .archive
        .load(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Version {id} not found")))?;
    let view = state.store.restore(doc);
    tracing::info!("Restored version {id}");
    Ok(Json(view))
}
