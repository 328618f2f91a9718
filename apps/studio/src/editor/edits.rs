//! Pure helpers that compute new record sequences from the current ones.
//!
//! The store only knows how to replace a whole sequence; these produce the
//! replacement. Each returns `None` when the edit would change nothing, so the
//! caller can skip the commit.

use crate::models::cv::{Education, EducationPatch, WorkExperience, WorkExperiencePatch};

/// A record with a stable identifier and a patch type that merges into it.
pub trait Record: Clone {
    type Patch;

    fn id(&self) -> &str;
    fn patched(&self, patch: &Self::Patch) -> Self;
}

impl Record for WorkExperience {
    type Patch = WorkExperiencePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn patched(&self, patch: &WorkExperiencePatch) -> Self {
        patch.apply(self)
    }
}

impl Record for Education {
    type Patch = EducationPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn patched(&self, patch: &EducationPatch) -> Self {
        patch.apply(self)
    }
}

/// Appends `record`, unless a sibling already carries its identifier.
pub fn append_record<R: Record>(records: &[R], record: R) -> Option<Vec<R>> {
    if records.iter().any(|r| r.id() == record.id()) {
        return None;
    }
    let mut next = records.to_vec();
    next.push(record);
    Some(next)
}

/// Merges `patch` into the record with `id`. Absent ids are a no-op.
pub fn merge_record<R: Record>(records: &[R], id: &str, patch: &R::Patch) -> Option<Vec<R>> {
    if !records.iter().any(|r| r.id() == id) {
        return None;
    }
    Some(
        records
            .iter()
            .map(|r| if r.id() == id { r.patched(patch) } else { r.clone() })
            .collect(),
    )
}

/// Drops the record with `id`. Absent ids are a no-op.
pub fn remove_record<R: Record>(records: &[R], id: &str) -> Option<Vec<R>> {
    if !records.iter().any(|r| r.id() == id) {
        return None;
    }
    Some(records.iter().filter(|r| r.id() != id).cloned().collect())
}

/// Adds a trimmed skill. Blank input and exact duplicates are suppressed.
pub fn add_skill(skills: &[String], skill: &str) -> Option<Vec<String>> {
    let skill = skill.trim();
    if skill.is_empty() || skills.iter().any(|s| s == skill) {
        return None;
    }
    let mut next = skills.to_vec();
    next.push(skill.to_string());
    Some(next)
}

pub fn remove_skill(skills: &[String], skill: &str) -> Option<Vec<String>> {
    if !skills.iter().any(|s| s == skill) {
        return None;
    }
    Some(skills.iter().filter(|s| *s != skill).cloned().collect())
}

/// Trims every skill, drops blanks and removes duplicates, keeping the first
/// occurrence of each. Whole-set replacements go through this so the set holds
/// the same values `add_skill` would have let in.
pub fn dedup_skills(skills: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !out.iter().any(|s| s == skill) {
            out.push(skill.to_string());
        }
    }
    out
}

/// First identifier carried by more than one record, if any.
pub fn duplicate_id<R: Record>(records: &[R]) -> Option<&str> {
    records.iter().enumerate().find_map(|(i, r)| {
        records[..i]
            .iter()
            .any(|earlier| earlier.id() == r.id())
            .then(|| r.id())
    })
}
