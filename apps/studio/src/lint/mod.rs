//! Text lint engine: a fixed set of stylistic heuristics for CV prose.
//!
//! `lint` is pure and holds no state between calls; it is safe to call from any
//! number of tasks at once. Offsets are character (Unicode scalar) offsets into
//! the scanned text, end-exclusive.

use serde::{Deserialize, Serialize};

use crate::models::cv::Document;

pub mod handlers;
pub mod rules;

pub use rules::collapse_whitespace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    Info,
    Warning,
    Error,
}

/// Text transformation offered as an automatic fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FixAction {
    /// Deletes the characters in `start..end`. Surrounding whitespace is left
    /// as is, so removing a leading word leaves a leading space.
    RemoveSpan { start: usize, end: usize },
    /// Collapses every repeated-whitespace run in the text to one space.
    CollapseWhitespace,
}

impl FixAction {
    pub fn apply(&self, text: &str) -> String {
        match self {
            FixAction::RemoveSpan { start, end } => text
                .chars()
                .enumerate()
                .filter(|(i, _)| i < start || i >= end)
                .map(|(_, c)| c)
                .collect(),
            FixAction::CollapseWhitespace => collapse_whitespace(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintFix {
    pub label: String,
    pub action: FixAction,
}

impl LintFix {
    pub fn apply(&self, text: &str) -> String {
        self.action.apply(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLintIssue {
    pub id: String,
    pub message: String,
    pub severity: LintSeverity,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<LintFix>,
}

/// An issue found in one field of a document.
#[derive(Debug, Clone, Serialize)]
pub struct FieldIssue {
    pub field: String,
    #[serde(flatten)]
    pub issue: TextLintIssue,
}

/// Maps byte offsets (what the regex engine reports) to character offsets.
pub struct CharIndex {
    boundaries: Vec<usize>,
}

impl CharIndex {
    pub fn new(text: &str) -> Self {
        Self {
            boundaries: text.char_indices().map(|(b, _)| b).collect(),
        }
    }

    /// Character offset of the char boundary at `byte`. A byte offset at or past
    /// the end maps to the character length.
    pub fn char_offset(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(i) => i,
            Err(i) => i,
        }
    }
}

/// Scans `text` with every rule and returns all issues ordered by start offset.
/// Issues sharing a start keep rule order (the sort is stable).
pub fn lint(text: &str) -> Vec<TextLintIssue> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let index = CharIndex::new(text);
    let mut issues: Vec<TextLintIssue> = rules::default_rules()
        .iter()
        .flat_map(|rule| rule.scan(text, &index))
        .collect();
    issues.sort_by_key(|issue| issue.start);
    issues
}

/// Lints every free-text field of `doc`: the summary and each work-experience
/// description.
pub fn lint_document(doc: &Document) -> Vec<FieldIssue> {
    let mut out: Vec<FieldIssue> = lint(&doc.professional_summary)
        .into_iter()
        .map(|issue| FieldIssue {
            field: "summary".to_string(),
            issue,
        })
        .collect();
    for exp in &doc.work_experience {
        let field = format!("workExperience[{}].description", exp.id);
        out.extend(lint(&exp.description).into_iter().map(|issue| FieldIssue {
            field: field.clone(),
            issue,
        }));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::WorkExperience;

    #[test]
    fn test_empty_and_blank_input_yield_nothing() {
        assert!(lint("").is_empty());
        assert!(lint("   ").is_empty());
        assert!(lint("\n\t ").is_empty());
    }

    #[test]
    fn test_clean_text_yields_nothing() {
        assert!(lint("Cut cloud spend 30% by consolidating clusters.").is_empty());
    }

    #[test]
    fn test_issues_sorted_by_start() {
        let text = "We were involved in  projects that I was tasked with; my role was expanded.";
        let issues = lint(text);
        assert!(issues.len() >= 5);
        assert!(issues.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn test_ids_unique_within_scan() {
        let text = "I  I  I was asked";
        let issues = lint(text);
        let mut ids: Vec<_> = issues.iter().map(|i| i.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), issues.len());
    }

    #[test]
    fn test_whitespace_fix_collapses_every_run() {
        let text = "a  b   c";
        let issues = lint(text);
        assert_eq!(issues.len(), 2);
        assert_eq!((issues[0].start, issues[0].end), (1, 3));
        assert_eq!((issues[1].start, issues[1].end), (4, 7));
        let fix = issues[0].fix.as_ref().unwrap();
        assert_eq!(fix.label, "Fix spacing");
        assert_eq!(fix.apply(text), "a b c");
    }

    #[test]
    fn test_pronoun_fix_removes_only_the_token() {
        let text = "I led the team";
        let issues = lint(text);
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.id, "firstperson-0");
        assert_eq!(issue.severity, LintSeverity::Info);
        assert_eq!(issue.fix.as_ref().unwrap().apply(text), " led the team");
    }

    #[test]
    fn test_offsets_are_characters_not_bytes() {
        let text = "Café  société";
        let issues = lint(text);
        assert_eq!(issues.len(), 1);
        assert_eq!((issues[0].start, issues[0].end), (4, 6));
    }

    #[test]
    fn test_remove_span_with_multibyte_text() {
        let action = FixAction::RemoveSpan { start: 5, end: 8 };
        assert_eq!(action.apply("Über my team"), "Über team");
        // Spans past the end of a shorter text are clamped.
        assert_eq!(FixAction::RemoveSpan { start: 10, end: 20 }.apply("short"), "short");
    }

    #[test]
    fn test_identical_starts_keep_rule_order() {
        // "was finished" (passive) and the long run both start at 0.
        let text = format!("was finished {}", "x".repeat(200));
        let issues = lint(&text);
        assert_eq!(issues[0].id, "passive-0");
        assert_eq!(issues[1].id, "length-0");
    }

    #[test]
    fn test_lint_document_tags_fields() {
        let mut exp = WorkExperience::new();
        exp.description = "Worked on the billing system".into();
        let doc = Document {
            professional_summary: "I build things".into(),
            work_experience: vec![exp.clone()],
            ..Default::default()
        };
        let issues = lint_document(&doc);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "summary");
        assert_eq!(issues[1].field, format!("workExperience[{}].description", exp.id));
        assert_eq!(issues[1].issue.id, "vague-0");
    }

    #[test]
    fn test_concurrent_scans_agree() {
        let text = "We were involved in   the launch.";
        let expected = lint(text);
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(move || lint(text)))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }
}
