pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::advisor::handlers as advice;
use crate::editor::handlers as editor;
use crate::lint::handlers as lint;
use crate::state::AppState;
use crate::versions::handlers as versions;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document editing
        .route("/api/v1/document", get(editor::handle_get_document))
        .route(
            "/api/v1/document/personal-details",
            patch(editor::handle_update_personal_details),
        )
        .route(
            "/api/v1/document/summary",
            put(editor::handle_update_summary),
        )
        .route(
            "/api/v1/document/work-experience",
            put(editor::handle_replace_work_experience)
                .post(editor::handle_add_work_experience),
        )
        .route(
            "/api/v1/document/work-experience/:id",
            patch(editor::handle_edit_work_experience)
                .delete(editor::handle_remove_work_experience),
        )
        .route(
            "/api/v1/document/education",
            put(editor::handle_replace_education).post(editor::handle_add_education),
        )
        .route(
            "/api/v1/document/education/:id",
            patch(editor::handle_edit_education)
                .delete(editor::handle_remove_education),
        )
        .route(
            "/api/v1/document/skills",
            put(editor::handle_replace_skills).post(editor::handle_add_skill),
        )
        .route(
            "/api/v1/document/skills/:skill",
            delete(editor::handle_remove_skill),
        )
        .route(
            "/api/v1/document/template",
            put(editor::handle_update_template),
        )
        .route(
            "/api/v1/document/settings",
            patch(editor::handle_update_settings),
        )
        .route("/api/v1/document/undo", post(editor::handle_undo))
        .route("/api/v1/document/redo", post(editor::handle_redo))
        .route("/api/v1/document/export", get(editor::handle_export))
        .route("/api/v1/document/import", post(editor::handle_import))
        .route("/api/v1/document/analytics", get(editor::handle_analytics))
        .route("/api/v1/document/lint", get(editor::handle_lint_document))
        // Text lint
        .route("/api/v1/lint", post(lint::handle_lint))
        .route("/api/v1/lint/fix", post(lint::handle_apply_fix))
        // Saved versions
        .route(
            "/api/v1/versions",
            get(versions::handle_list_versions).post(versions::handle_save_version),
        )
        .route(
            "/api/v1/versions/:id",
            get(versions::handle_get_version).delete(versions::handle_delete_version),
        )
        .route(
            "/api/v1/versions/:id/restore",
            post(versions::handle_restore_version),
        )
        // AI suggestions
        .route("/api/v1/advice/summary", post(advice::handle_suggest_summary))
        .route("/api/v1/advice/bullets/:id", post(advice::handle_suggest_bullets))
        .with_state(state)
}
