use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::advisor::AdvisorError;
use crate::editor::store::EditError;
use crate::transfer::TransferError;
use crate::versions::archive::ArchiveError;

/// Application-level error type.
/// Implements `IntoResponse` so handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("AI suggestions are disabled")]
    AiDisabled,

    #[error("Advisor error: {0}")]
    Advisor(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ArchiveError> for AppError {
    fn from(e: ArchiveError) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<EditError> for AppError {
    fn from(e: EditError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<TransferError> for AppError {
    fn from(e: TransferError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<AdvisorError> for AppError {
    fn from(e: AdvisorError) -> Self {
        match e {
            AdvisorError::Disabled => AppError::AiDisabled,
            other => AppError::Advisor(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::AiDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI_DISABLED",
                "AI suggestions are not enabled".to_string(),
            ),
            AppError::Advisor(msg) => {
                tracing::error!("Advisor error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ADVISOR_ERROR",
                    "The suggestion service failed; try again later".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Saving to local storage failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::AiDisabled, StatusCode::SERVICE_UNAVAILABLE),
            (AppError::Advisor("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_duplicate_record_id_is_a_validation_error() {
        let err = AppError::from(EditError::DuplicateId("abc".into()));
        assert!(matches!(&err, AppError::Validation(msg) if msg.contains("abc")));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_disabled_advisor_maps_to_ai_disabled() {
        assert!(matches!(
            AppError::from(AdvisorError::Disabled),
            AppError::AiDisabled
        ));
        assert!(matches!(
            AppError::from(AdvisorError::EmptyContent),
            AppError::Advisor(_)
        ));
    }
}
