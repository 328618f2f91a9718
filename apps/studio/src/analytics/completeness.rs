use serde::{Deserialize, Serialize};

use crate::models::cv::Document;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionLevel {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl CompletionLevel {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p >= 90 => CompletionLevel::Excellent,
            p if p >= 70 => CompletionLevel::Good,
            p if p >= 50 => CompletionLevel::Fair,
            _ => CompletionLevel::NeedsWork,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub id: String,
    pub label: String,
    pub weight: u32,
    pub completed: bool,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessReport {
    pub percentage: u32,
    pub level: CompletionLevel,
    pub completed_items: usize,
    pub total_items: usize,
    pub items: Vec<CompletionItem>,
    pub next_steps: Vec<String>,
}

/// Summary must be longer than this (in characters) to count as written.
const SUMMARY_MIN_CHARS: usize = 50;
/// Skills needed before the skills section counts as complete.
const SKILLS_MIN: usize = 5;

const COMPLETION_WEIGHTS: &[(&str, &str, u32)] = &[
    ("personalDetails", "Personal Details", 15),
    ("professionalSummary", "Professional Summary", 20),
    ("workExperience", "Work Experience", 30),
    ("education", "Education", 15),
    ("skills", "Skills", 20),
];

fn is_section_complete(id: &str, doc: &Document) -> bool {
    match id {
        "personalDetails" => {
            !doc.personal_details.full_name.is_empty() && !doc.personal_details.email.is_empty()
        }
        "professionalSummary" => doc.professional_summary.chars().count() > SUMMARY_MIN_CHARS,
        "workExperience" => !doc.work_experience.is_empty(),
        "education" => !doc.education.is_empty(),
        "skills" => doc.skills.len() >= SKILLS_MIN,
        _ => false,
    }
}

fn section_tips(id: &str) -> &'static [&'static str] {
    match id {
        "personalDetails" => &[
            "Include professional email",
            "Add LinkedIn profile",
            "Use current phone number",
        ],
        "professionalSummary" => &[
            "Keep it 2-3 sentences",
            "Use action verbs",
            "Highlight key achievements",
        ],
        "workExperience" => &[
            "Quantify achievements",
            "Use bullet points",
            "Include relevant keywords",
        ],
        "education" => &[
            "Include relevant degrees",
            "Add certifications",
            "List academic achievements",
        ],
        "skills" => &[
            "List relevant skills",
            "Include proficiency levels",
            "Match job requirements",
        ],
        _ => &[],
    }
}

/// Weighted completion of the five core sections.
pub fn compute_completeness_report(doc: &Document) -> CompletenessReport {
    let items: Vec<CompletionItem> = COMPLETION_WEIGHTS
        .iter()
        .map(|(id, label, weight)| CompletionItem {
            id: id.to_string(),
            label: label.to_string(),
            weight: *weight,
            completed: is_section_complete(id, doc),
            tips: section_tips(id).iter().map(|t| t.to_string()).collect(),
        })
        .collect();

    let total_weight: u32 = items.iter().map(|i| i.weight).sum();
    let completed_weight: u32 = items.iter().filter(|i| i.completed).map(|i| i.weight).sum();
    let percentage = if total_weight > 0 {
        ((completed_weight as f64 / total_weight as f64) * 100.0).round() as u32
    } else {
        0
    };

    let incomplete: Vec<_> = items.iter().filter(|i| !i.completed).collect();
    let next_steps = if incomplete.is_empty() {
        vec![
            "Your CV is complete! Consider adding more achievements or skills.".to_string(),
            "Review and optimize your content for ATS systems.".to_string(),
        ]
    } else {
        incomplete
            .iter()
            .take(2)
            .map(|i| format!("Complete your {}", i.label.to_lowercase()))
            .collect()
    };

    CompletenessReport {
        percentage,
        level: CompletionLevel::from_percentage(percentage),
        completed_items: items.len() - incomplete.len(),
        total_items: items.len(),
        items,
        next_steps,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvAnalytics {
    /// Share of filled fields, 0 to 100.
    pub completion: u32,
    pub summary_word_count: usize,
    pub experience_count: usize,
    pub education_count: usize,
    pub skills_count: usize,
    pub tips: Vec<String>,
    pub warnings: Vec<String>,
}

/// Field-level completion score plus writing tips and warnings.
pub fn compute_analytics(doc: &Document) -> CvAnalytics {
    let personal = &doc.personal_details;
    let personal_fields = [
        &personal.full_name,
        &personal.email,
        &personal.phone,
        &personal.location,
    ];
    let section_checks = [
        !doc.professional_summary.is_empty(),
        !doc.work_experience.is_empty(),
        !doc.education.is_empty(),
        doc.skills.len() >= SKILLS_MIN,
    ];
    let total = personal_fields.len() + section_checks.len();
    let completed = personal_fields.iter().filter(|f| !f.is_empty()).count()
        + section_checks.iter().filter(|c| **c).count();
    let completion = ((completed as f64 / total as f64) * 100.0).round() as u32;

    let summary_word_count = doc.professional_summary.split_whitespace().count();
    let experience_count = doc.work_experience.len();
    let education_count = doc.education.len();
    let skills_count = doc.skills.len();

    let mut tips = Vec::new();
    let mut warnings = Vec::new();

    if completion < 100 {
        tips.push("Complete all sections to maximize your CV's impact".to_string());
    }

    if summary_word_count < 20 {
        tips.push("Consider expanding your professional summary (aim for 20-50 words)".to_string());
    } else if summary_word_count > 100 {
        warnings.push("Your professional summary is quite long. Consider condensing it".to_string());
    }

    match experience_count {
        0 => tips.push(
            "Add your work experience to showcase your professional background".to_string(),
        ),
        1 => tips.push("Consider adding more work experience if available".to_string()),
        _ => {}
    }

    if education_count == 0 {
        tips.push(
            "Include your education to provide context about your qualifications".to_string(),
        );
    }

    if skills_count < SKILLS_MIN {
        tips.push("Add more skills to demonstrate your capabilities (aim for 5-10)".to_string());
    } else if skills_count > 15 {
        warnings.push(
            "You have many skills listed. Consider focusing on the most relevant ones".to_string(),
        );
    }

    tips.push(
        "Use action verbs in your descriptions (e.g., 'managed', 'developed', 'achieved')"
            .to_string(),
    );
    tips.push(
        "Include quantifiable achievements where possible (e.g., 'increased sales by 20%')"
            .to_string(),
    );

    CvAnalytics {
        completion,
        summary_word_count,
        experience_count,
        education_count,
        skills_count,
        tips,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{Education, WorkExperience};

    fn complete_doc() -> Document {
        let mut doc = Document::default();
        doc.personal_details.full_name = "Ada Lovelace".into();
        doc.personal_details.email = "ada@example.com".into();
        doc.personal_details.phone = "020 7946 0000".into();
        doc.personal_details.location = "London".into();
        doc.professional_summary = "Mathematician who wrote the first published algorithm \
            intended for a general-purpose computing machine."
            .into();
        doc.work_experience = vec![WorkExperience::new(), WorkExperience::new()];
        doc.education = vec![Education::new()];
        doc.skills = ["Maths", "Analysis", "Logic", "Writing", "Translation"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        doc
    }

    #[test]
    fn test_empty_document_needs_work() {
        let report = compute_completeness_report(&Document::default());
        assert_eq!(report.percentage, 0);
        assert_eq!(report.level, CompletionLevel::NeedsWork);
        assert_eq!(report.completed_items, 0);
        assert_eq!(report.total_items, 5);
        assert_eq!(
            report.next_steps,
            vec!["Complete your personal details", "Complete your professional summary"]
        );
    }

    #[test]
    fn test_complete_document_is_excellent() {
        let report = compute_completeness_report(&complete_doc());
        assert_eq!(report.percentage, 100);
        assert_eq!(report.level, CompletionLevel::Excellent);
        assert_eq!(report.next_steps.len(), 2);
        assert!(report.next_steps[0].starts_with("Your CV is complete"));
    }

    #[test]
    fn test_weights_are_summed_per_section() {
        let mut doc = Document::default();
        doc.work_experience = vec![WorkExperience::new()];
        doc.education = vec![Education::new()];
        let report = compute_completeness_report(&doc);
        // 30 + 15 of 100
        assert_eq!(report.percentage, 45);
        assert_eq!(report.level, CompletionLevel::NeedsWork);
    }

    #[test]
    fn test_short_summary_does_not_count() {
        let mut doc = Document::default();
        doc.professional_summary = "Too short.".into();
        let report = compute_completeness_report(&doc);
        assert!(!report.items[1].completed);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(CompletionLevel::from_percentage(90), CompletionLevel::Excellent);
        assert_eq!(CompletionLevel::from_percentage(89), CompletionLevel::Good);
        assert_eq!(CompletionLevel::from_percentage(70), CompletionLevel::Good);
        assert_eq!(CompletionLevel::from_percentage(50), CompletionLevel::Fair);
        assert_eq!(CompletionLevel::from_percentage(49), CompletionLevel::NeedsWork);
    }

    #[test]
    fn test_analytics_for_empty_document() {
        let a = compute_analytics(&Document::default());
        assert_eq!(a.completion, 0);
        assert_eq!(a.summary_word_count, 0);
        assert!(a.tips.iter().any(|t| t.contains("work experience")));
        assert!(a.tips.iter().any(|t| t.contains("aim for 5-10")));
        assert!(a.warnings.is_empty());
    }

    #[test]
    fn test_analytics_warns_on_long_summary_and_many_skills() {
        let mut doc = complete_doc();
        doc.professional_summary = "word ".repeat(120);
        doc.skills = (0..16).map(|i| format!("skill-{i}")).collect();
        let a = compute_analytics(&doc);
        assert_eq!(a.completion, 100);
        assert_eq!(a.summary_word_count, 120);
        assert_eq!(a.warnings.len(), 2);
        assert!(!a.tips.iter().any(|t| t.starts_with("Complete all sections")));
    }
}
