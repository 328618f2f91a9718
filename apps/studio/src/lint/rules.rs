//! The fixed rule set. Each rule scans the whole input on its own and knows
//! nothing about the others.

use std::sync::OnceLock;

use regex::Regex;

use super::{CharIndex, FixAction, LintFix, LintSeverity, TextLintIssue};

/// Runs of this many characters without a line break are flagged.
pub const LONG_RUN_CHARS: usize = 180;

pub trait LintRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn scan(&self, text: &str, index: &CharIndex) -> Vec<TextLintIssue>;
}

/// What a pattern rule offers as an automatic fix.
#[derive(Debug, Clone, Copy)]
enum FixKind {
    None,
    RemoveMatch,
    CollapseWhitespace,
}

struct PatternRule {
    name: &'static str,
    regex: Regex,
    message: &'static str,
    severity: LintSeverity,
    fix: FixKind,
}

impl LintRule for PatternRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn scan(&self, text: &str, index: &CharIndex) -> Vec<TextLintIssue> {
        self.regex
            .find_iter(text)
            .map(|m| {
                let start = index.char_offset(m.start());
                let end = index.char_offset(m.end());
                let fix = match self.fix {
                    FixKind::None => None,
                    FixKind::RemoveMatch => Some(LintFix {
                        label: "Remove pronoun".to_string(),
                        action: FixAction::RemoveSpan { start, end },
                    }),
                    FixKind::CollapseWhitespace => Some(LintFix {
                        label: "Fix spacing".to_string(),
                        action: FixAction::CollapseWhitespace,
                    }),
                };
                TextLintIssue {
                    id: format!("{}-{}", self.name, start),
                    message: self.message.to_string(),
                    severity: self.severity,
                    start,
                    end,
                    fix,
                }
            })
            .collect()
    }
}

/// Flags overly long sentences or paragraphs: any run of at least `min_chars`
/// characters containing no line break.
struct LongRunRule {
    min_chars: usize,
}

/// Characters that end a run for [`LongRunRule`]; the same set `.` refuses to match.
const LINE_BREAKS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

impl LintRule for LongRunRule {
    fn name(&self) -> &'static str {
        "length"
    }

    fn scan(&self, text: &str, index: &CharIndex) -> Vec<TextLintIssue> {
        let mut issues = Vec::new();
        let mut run_start = 0;
        for line in text.split(LINE_BREAKS) {
            let len = line.chars().count();
            if len >= self.min_chars {
                let start = index.char_offset(run_start);
                issues.push(TextLintIssue {
                    id: format!("{}-{}", self.name(), start),
                    message: "Sentence is long; consider splitting.".to_string(),
                    severity: LintSeverity::Info,
                    start,
                    end: start + len,
                    fix: None,
                });
            }
            run_start += line.len();
            run_start += text[run_start..].chars().next().map_or(0, char::len_utf8);
        }
        issues
    }
}

fn repeated_whitespace() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").ok()).as_ref()
}

/// Collapses every run of two or more whitespace characters to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    match repeated_whitespace() {
        Some(re) => re.replace_all(text, " ").into_owned(),
        None => text.to_string(),
    }
}

/// The rules in reporting order. Compiled once.
pub fn default_rules() -> &'static [Box<dyn LintRule>] {
    static RULES: OnceLock<Vec<Box<dyn LintRule>>> = OnceLock::new();
    RULES.get_or_init(|| {
        let patterns = [
            (
                "passive",
                r"(?i)\b(is|was|were|be|been|being|are|am)\s+\w+ed\b",
                "Avoid passive voice; use strong action verbs.",
                LintSeverity::Warning,
                FixKind::None,
            ),
            (
                "firstperson",
                r"(?i)\b(I|my|me|we|our)\b",
                "Avoid first-person pronouns in resumes.",
                LintSeverity::Info,
                FixKind::RemoveMatch,
            ),
            (
                "vague",
                r"(?i)(responsible for|worked on|helped with|involved in)",
                "Replace vague phrase with specific impact and metrics.",
                LintSeverity::Warning,
                FixKind::None,
            ),
        ];

        let mut rules: Vec<Box<dyn LintRule>> = patterns
            .into_iter()
            .filter_map(|(name, pattern, message, severity, fix)| {
                Regex::new(pattern).ok().map(|regex| {
                    Box::new(PatternRule {
                        name,
                        regex,
                        message,
                        severity,
                        fix,
                    }) as Box<dyn LintRule>
                })
            })
            .collect();

        rules.push(Box::new(LongRunRule {
            min_chars: LONG_RUN_CHARS,
        }));

        if let Some(regex) = repeated_whitespace() {
            rules.push(Box::new(PatternRule {
                name: "spaces",
                regex: regex.clone(),
                message: "Normalize repeated spaces.",
                severity: LintSeverity::Info,
                fix: FixKind::CollapseWhitespace,
            }));
        }
        rules
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_with(name: &str, text: &str) -> Vec<TextLintIssue> {
        let index = CharIndex::new(text);
        default_rules()
            .iter()
            .filter(|r| r.name() == name)
            .flat_map(|r| r.scan(text, &index))
            .collect()
    }

    #[test]
    fn test_all_five_rules_compile() {
        let names: Vec<_> = default_rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["passive", "firstperson", "vague", "length", "spaces"]);
    }

    #[test]
    fn test_passive_matches_be_verb_and_participle() {
        let issues = scan_with("passive", "The API was designed and tests were automated.");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].start, 8);
        assert_eq!(issues[0].end, 20);
        assert_eq!(issues[0].severity, LintSeverity::Warning);
        assert!(issues[0].fix.is_none());
    }

    #[test]
    fn test_passive_ignores_active_voice() {
        assert!(scan_with("passive", "Designed the API and automated tests.").is_empty());
    }

    #[test]
    fn test_first_person_is_whole_word_and_case_insensitive() {
        let issues = scan_with("firstperson", "MY team and I; Ahmed met Iceland");
        let spans: Vec<_> = issues.iter().map(|i| (i.start, i.end)).collect();
        assert_eq!(spans, vec![(0, 2), (12, 13)]);
    }

    #[test]
    fn test_vague_phrases_flagged() {
        let issues = scan_with("vague", "Responsible for hiring; also worked on billing.");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].id, "vague-0");
    }

    #[test]
    fn test_long_run_flagged_once() {
        let text = "a".repeat(200);
        let issues = scan_with("length", &text);
        assert_eq!(issues.len(), 1);
        assert_eq!((issues[0].start, issues[0].end), (0, 200));
    }

    #[test]
    fn test_line_breaks_reset_long_run() {
        let text = format!("{}\n{}", "a".repeat(179), "b".repeat(179));
        assert!(scan_with("length", &text).is_empty());
        let text = format!("{}\r\n{}", "a".repeat(10), "b".repeat(180));
        let issues = scan_with("length", &text);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].start, 12);
    }

    #[test]
    fn test_unicode_line_separators_reset_long_run() {
        let text = format!("{}\u{2028}{}", "a".repeat(179), "b".repeat(179));
        assert!(scan_with("length", &text).is_empty());
        let text = format!("{}\u{2029}{}", "a".repeat(5), "b".repeat(180));
        let issues = scan_with("length", &text);
        assert_eq!(issues.len(), 1);
        assert_eq!((issues[0].start, issues[0].end), (6, 186));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a  b   c"), "a b c");
        assert_eq!(collapse_whitespace("a\n\nb"), "a b");
        assert_eq!(collapse_whitespace("a b"), "a b");
    }
}
