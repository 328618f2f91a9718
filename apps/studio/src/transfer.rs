//! JSON export and import of a whole document.

use serde_json::Value;
use thiserror::Error;

use crate::editor::edits::{dedup_skills, duplicate_id};
use crate::models::cv::Document;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid CV data: {0}")]
    InvalidShape(serde_json::Error),

    #[error("Duplicate record id '{0}'")]
    DuplicateId(String),
}

const REQUIRED_FIELDS: &[&str] = &["personalDetails", "professionalSummary"];

pub fn export_json(doc: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// `<full name>_data.json`, or `CV_data.json` while the name is blank.
pub fn export_file_name(doc: &Document) -> String {
    let name = doc.personal_details.full_name.trim();
    let name = if name.is_empty() { "CV" } else { name };
    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("{safe}_data.json")
}

/// Parses exported CV JSON. `personalDetails` and `professionalSummary` must be
/// present; missing lists default to empty and a missing template to the default.
/// Settings are not part of an export contract, so when absent the settings of
/// `current` are kept.
pub fn import_json(raw: &str, current: &Document) -> Result<Document, TransferError> {
    let value: Value = serde_json::from_str(raw).map_err(TransferError::InvalidJson)?;
    for &field in REQUIRED_FIELDS {
        if value.get(field).map_or(true, Value::is_null) {
            return Err(TransferError::MissingField(field));
        }
    }
    let has_settings = value.get("settings").is_some_and(|s| !s.is_null());

    let mut doc: Document = serde_json::from_value(value).map_err(TransferError::InvalidShape)?;
    if let Some(id) = duplicate_id(&doc.work_experience).or(duplicate_id(&doc.education)) {
        return Err(TransferError::DuplicateId(id.to_string()));
    }
    doc.skills = dedup_skills(&doc.skills);
    if !has_settings {
        doc.settings = current.settings.clone();
    }
    Ok(doc)
}
