use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::completeness::{
    compute_analytics, compute_completeness_report, CompletenessReport, CvAnalytics,
};
use crate::editor::store::EditorView;
use crate::errors::AppError;
use crate::lint::{lint_document, FieldIssue};
use crate::models::cv::{
    Education, EducationPatch, PersonalDetailsPatch, SettingsPatch, Template, WorkExperience,
    WorkExperiencePatch,
};
use crate::state::AppState;
use crate::transfer::{export_file_name, export_json, import_json};

#[derive(Deserialize)]
pub struct SummaryBody {
    pub summary: String,
}

#[derive(Deserialize)]
pub struct SkillBody {
    pub skill: String,
}

#[derive(Deserialize)]
pub struct TemplateBody {
    pub template: Template,
}

/// View returned when a record is appended, carrying the new record's id.
#[derive(Serialize)]
pub struct CreatedView {
    pub id: String,
    #[serde(flatten)]
    pub view: EditorView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalytics {
    pub completeness: CompletenessReport,
    pub analytics: CvAnalytics,
}

/// GET /api/v1/document
pub async fn handle_get_document(State(state): State<AppState>) -> Json<EditorView> {
    Json(state.store.view())
}

/// PATCH /api/v1/document/personal-details
pub async fn handle_update_personal_details(
    State(state): State<AppState>,
    Json(patch): Json<PersonalDetailsPatch>,
) -> Json<EditorView> {
    Json(state.store.update_personal_details(&patch))
}

/// PUT /api/v1/document/summary
pub async fn handle_update_summary(
    State(state): State<AppState>,
    Json(body): Json<SummaryBody>,
) -> Json<EditorView> {
    Json(state.store.update_professional_summary(body.summary))
}

/// PUT /api/v1/document/work-experience
pub async fn handle_replace_work_experience(
    State(state): State<AppState>,
    Json(records): Json<Vec<WorkExperience>>,
) -> Result<Json<EditorView>, AppError> {
    Ok(Json(state.store.update_work_experience(records)?))
}

/// POST /api/v1/document/work-experience
pub async fn handle_add_work_experience(
    State(state): State<AppState>,
    Json(patch): Json<WorkExperiencePatch>,
) -> (StatusCode, Json<CreatedView>) {
    let (id, view) = state.store.add_work_experience(&patch);
    (StatusCode::CREATED, Json(CreatedView { id, view }))
}

/// PATCH /api/v1/document/work-experience/:id
pub async fn handle_edit_work_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<WorkExperiencePatch>,
) -> Result<Json<EditorView>, AppError> {
    state
        .store
        .edit_work_experience(&id, &patch)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Work experience {id} not found")))
}

/// DELETE /api/v1/document/work-experience/:id
pub async fn handle_remove_work_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<EditorView> {
    Json(state.store.remove_work_experience(&id))
}

/// PUT /api/v1/document/education
pub async fn handle_replace_education(
    State(state): State<AppState>,
    Json(records): Json<Vec<Education>>,
) -> Result<Json<EditorView>, AppError> {
    Ok(Json(state.store.update_education(records)?))
}

/// POST /api/v1/document/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Json(patch): Json<EducationPatch>,
) -> (StatusCode, Json<CreatedView>) {
    let (id, view) = state.store.add_education(&patch);
    (StatusCode::CREATED, Json(CreatedView { id, view }))
}

/// PATCH /api/v1/document/education/:id
pub async fn handle_edit_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<EducationPatch>,
) -> Result<Json<EditorView>, AppError> {
    state
        .store
        .edit_education(&id, &patch)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Education {id} not found")))
}

/// DELETE /api/v1/document/education/:id
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<EditorView> {
    Json(state.store.remove_education(&id))
}

/// PUT /api/v1/document/skills
pub async fn handle_replace_skills(
    State(state): State<AppState>,
    Json(skills): Json<Vec<String>>,
) -> Json<EditorView> {
    Json(state.store.update_skills(skills))
}

/// POST /api/v1/document/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(body): Json<SkillBody>,
) -> Json<EditorView> {
    Json(state.store.add_skill(&body.skill))
}

/// DELETE /api/v1/document/skills/:skill
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path(skill): Path<String>,
) -> Json<EditorView> {
    Json(state.store.remove_skill(&skill))
}

/// PUT /api/v1/document/template
pub async fn handle_update_template(
    State(state): State<AppState>,
    Json(body): Json<TemplateBody>,
) -> Json<EditorView> {
    Json(state.store.update_template(body.template))
}

/// PATCH /api/v1/document/settings
pub async fn handle_update_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Json<EditorView> {
    Json(state.store.update_settings(&patch))
}

/// POST /api/v1/document/undo
pub async fn handle_undo(State(state): State<AppState>) -> Json<EditorView> {
    Json(state.store.undo())
}

/// POST /api/v1/document/redo
pub async fn handle_redo(State(state): State<AppState>) -> Json<EditorView> {
    Json(state.store.redo())
}

/// GET /api/v1/document/export
/// Pretty-printed document JSON offered as a download.
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let doc = state.store.current();
    let body = export_json(&doc).context("Failed to serialize document for export")?;
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(&doc));
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// POST /api/v1/document/import
/// Takes the raw text of an exported file; a successful import is one commit.
pub async fn handle_import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<EditorView>, AppError> {
    let doc = import_json(&body, &state.store.current())?;
    let view = state.store.restore(doc);
    info!("Imported document from JSON");
    Ok(Json(view))
}

/// GET /api/v1/document/analytics
pub async fn handle_analytics(State(state): State<AppState>) -> Json<DocumentAnalytics> {
    let doc = state.store.current();
    Json(DocumentAnalytics {
        completeness: compute_completeness_report(&doc),
        analytics: compute_analytics(&doc),
    })
}

/// GET /api/v1/document/lint
pub async fn handle_lint_document(State(state): State<AppState>) -> Json<Vec<FieldIssue>> {
    Json(lint_document(&state.store.current()))
}
