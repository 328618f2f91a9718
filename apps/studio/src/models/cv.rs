use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Contact block at the top of every CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linked_in: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    /// Blank while `current` is set.
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
}

impl WorkExperience {
    /// Creates an empty record with a freshly minted identifier.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_title: String::new(),
            company: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            current: false,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub grade: Option<String>,
}

impl Education {
    /// Creates an empty record with a freshly minted identifier.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            degree: String::new(),
            institution: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            grade: None,
        }
    }
}

/// Layout used by the preview. Stored values outside the known set fall back to
/// the default instead of failing the whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Modern,
    Classic,
}

impl Template {
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "classic" => Template::Classic,
            _ => Template::Modern,
        }
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Template::from_id(&raw))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    System,
    Serif,
    Mono,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Compact,
    #[default]
    Comfortable,
    Spacious,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme_color: String,
    pub font_family: FontFamily,
    pub density: Density,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme_color: "blue".to_string(),
            font_family: FontFamily::default(),
            density: Density::default(),
        }
    }
}

/// The complete CV. Every edit produces a new value; nothing mutates a
/// `Document` that has already been handed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub personal_details: PersonalDetails,
    pub professional_summary: String,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub template: Template,
    pub settings: Settings,
}

// ────────────────────────────────────────────────────────────────────────────
// Patches (shallow merges)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetailsPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linked_in: Option<String>,
    pub website: Option<String>,
}

impl PersonalDetailsPatch {
    pub fn apply(&self, base: &PersonalDetails) -> PersonalDetails {
        PersonalDetails {
            full_name: merge(&self.full_name, &base.full_name),
            email: merge(&self.email, &base.email),
            phone: merge(&self.phone, &base.phone),
            location: merge(&self.location, &base.location),
            linked_in: self.linked_in.clone().or_else(|| base.linked_in.clone()),
            website: self.website.clone().or_else(|| base.website.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub theme_color: Option<String>,
    pub font_family: Option<FontFamily>,
    pub density: Option<Density>,
}

impl SettingsPatch {
    pub fn apply(&self, base: &Settings) -> Settings {
        Settings {
            theme_color: merge(&self.theme_color, &base.theme_color),
            font_family: self.font_family.unwrap_or(base.font_family),
            density: self.density.unwrap_or(base.density),
        }
    }
}

/// Field updates for one work-experience record. There is no `id` field:
/// identifiers never change after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperiencePatch {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl WorkExperiencePatch {
    pub fn apply(&self, base: &WorkExperience) -> WorkExperience {
        let current = self.current.unwrap_or(base.current);
        let end_date = if current && self.current == Some(true) {
            String::new()
        } else {
            merge(&self.end_date, &base.end_date)
        };
        WorkExperience {
            id: base.id.clone(),
            job_title: merge(&self.job_title, &base.job_title),
            company: merge(&self.company, &base.company),
            location: merge(&self.location, &base.location),
            start_date: merge(&self.start_date, &base.start_date),
            end_date,
            current,
            description: merge(&self.description, &base.description),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub grade: Option<String>,
}

impl EducationPatch {
    pub fn apply(&self, base: &Education) -> Education {
        Education {
            id: base.id.clone(),
            degree: merge(&self.degree, &base.degree),
            institution: merge(&self.institution, &base.institution),
            location: merge(&self.location, &base.location),
            start_date: merge(&self.start_date, &base.start_date),
            end_date: merge(&self.end_date, &base.end_date),
            grade: self.grade.clone().or_else(|| base.grade.clone()),
        }
    }
}

fn merge(patch: &Option<String>, base: &str) -> String {
    patch.clone().unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_is_empty_modern() {
        let doc = Document::default();
        assert_eq!(doc.personal_details.full_name, "");
        assert!(doc.work_experience.is_empty());
        assert!(doc.skills.is_empty());
        assert_eq!(doc.template, Template::Modern);
        assert_eq!(doc.settings.theme_color, "blue");
        assert_eq!(doc.settings.density, Density::Comfortable);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(Document::default()).unwrap();
        assert!(json.get("personalDetails").is_some());
        assert!(json.get("professionalSummary").is_some());
        assert!(json.get("workExperience").is_some());
        assert_eq!(json["template"], "modern");
        assert_eq!(json["settings"]["fontFamily"], "system");
    }

    #[test]
    fn test_unknown_template_falls_back_to_default() {
        let doc: Document = serde_json::from_str(r#"{"template": "brutalist"}"#).unwrap();
        assert_eq!(doc.template, Template::Modern);
        let doc: Document = serde_json::from_str(r#"{"template": "classic"}"#).unwrap();
        assert_eq!(doc.template, Template::Classic);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let doc: Document =
            serde_json::from_str(r#"{"personalDetails": {"fullName": "Ada"}}"#).unwrap();
        assert_eq!(doc.personal_details.full_name, "Ada");
        assert_eq!(doc.personal_details.email, "");
        assert_eq!(doc.settings, Settings::default());
    }

    #[test]
    fn test_personal_details_patch_is_shallow_merge() {
        let base = PersonalDetails {
            full_name: "Ada".into(),
            email: "ada@example.com".into(),
            ..Default::default()
        };
        let patch = PersonalDetailsPatch {
            full_name: Some("Ada Lovelace".into()),
            ..Default::default()
        };
        let merged = patch.apply(&base);
        assert_eq!(merged.full_name, "Ada Lovelace");
        assert_eq!(merged.email, "ada@example.com");
    }

    #[test]
    fn test_setting_current_blanks_end_date() {
        let mut base = WorkExperience::new();
        base.end_date = "2023-06".into();
        let patch = WorkExperiencePatch {
            current: Some(true),
            end_date: Some("2024-01".into()),
            ..Default::default()
        };
        let updated = patch.apply(&base);
        assert!(updated.current);
        assert_eq!(updated.end_date, "");
        assert_eq!(updated.id, base.id);
    }

    #[test]
    fn test_clearing_current_keeps_given_end_date() {
        let mut base = WorkExperience::new();
        base.current = true;
        let patch = WorkExperiencePatch {
            current: Some(false),
            end_date: Some("2024-01".into()),
            ..Default::default()
        };
        let updated = patch.apply(&base);
        assert!(!updated.current);
        assert_eq!(updated.end_date, "2024-01");
    }

    #[test]
    fn test_new_records_get_distinct_ids() {
        assert_ne!(WorkExperience::new().id, WorkExperience::new().id);
        assert_ne!(Education::new().id, Education::new().id);
    }

    #[test]
    fn test_settings_patch_keeps_unspecified_fields() {
        let patch = SettingsPatch {
            density: Some(Density::Compact),
            ..Default::default()
        };
        let merged = patch.apply(&Settings::default());
        assert_eq!(merged.density, Density::Compact);
        assert_eq!(merged.theme_color, "blue");
        assert_eq!(merged.font_family, FontFamily::System);
    }
}
