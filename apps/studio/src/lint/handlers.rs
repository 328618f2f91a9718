use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::lint::{lint, LintFix, TextLintIssue};

#[derive(Deserialize)]
pub struct LintRequest {
    pub text: String,
}

/// Either an issue id from a fresh scan of `text`, or a fix taken from an
/// earlier response.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixRequest {
    pub text: String,
    #[serde(default)]
    pub issue_id: Option<String>,
    #[serde(default)]
    pub fix: Option<LintFix>,
}

#[derive(Serialize)]
pub struct FixResponse {
    pub text: String,
    pub issues: Vec<TextLintIssue>,
}

/// POST /api/v1/lint
pub async fn handle_lint(Json(req): Json<LintRequest>) -> Json<Vec<TextLintIssue>> {
    Json(lint(&req.text))
}

/// POST /api/v1/lint/fix
/// Applies one fix and returns the new text with its issues re-scanned.
pub async fn handle_apply_fix(Json(req): Json<FixRequest>) -> Result<Json<FixResponse>, AppError> {
    let fix = match (req.fix, req.issue_id) {
        (Some(fix), _) => fix,
        (None, Some(issue_id)) => lint(&req.text)
            .into_iter()
            .find(|issue| issue.id == issue_id)
            .ok_or_else(|| AppError::NotFound(format!("Issue {issue_id} not found")))?
            .fix
            .ok_or_else(|| AppError::Validation(format!("Issue {issue_id} has no fix")))?,
        (None, None) => {
            return Err(AppError::Validation(
                "Either issueId or fix is required".to_string(),
            ))
        }
    };
    let text = fix.apply(&req.text);
    let issues = lint(&text);
    Ok(Json(FixResponse { text, issues }))
}
