use serde_json::json;

use crate::models::cv::{Document, WorkExperience};

pub const SUMMARY_SYSTEM: &str = "You produce ATS-friendly, quantified resume content.";

pub const BULLETS_SYSTEM: &str = "You write ATS-friendly, quantified resume bullets.";

const SUMMARY_INSTRUCTIONS: &str = "You are an expert CV writer for the UK market. \
    Create 2 concise professional summaries (2-3 sentences each) based strictly on the user's data. \
    Avoid first-person. Use strong action verbs, highlight outcomes and domain strengths. \
    Keep each option under 400 characters. Separate the options with a blank line.";

const BULLETS_INSTRUCTIONS: &str = "You are an expert CV writer for the UK market. \
    Create 6 succinct bullet points for the role below. Start each bullet with a strong action verb, \
    avoid pronouns, include outcomes and metrics (%, £, time). Keep each bullet under 160 characters. \
    Do not invent technologies not present in context. One bullet per line.";

pub fn summary_prompt(doc: &Document) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string_pretty(doc)?;
    Ok(format!(
        "{SUMMARY_INSTRUCTIONS}\n\nUser data (JSON):\n{data}"
    ))
}

/// Only the role itself plus skills and summary are sent, not the whole CV.
pub fn bullets_prompt(experience: &WorkExperience, doc: &Document) -> Result<String, serde_json::Error> {
    let role = serde_json::to_string_pretty(&json!({
        "jobTitle": experience.job_title,
        "company": experience.company,
        "description": experience.description,
        "location": experience.location,
    }))?;
    let context = serde_json::to_string_pretty(&json!({
        "skills": doc.skills,
        "summary": doc.professional_summary,
    }))?;
    Ok(format!(
        "{BULLETS_INSTRUCTIONS}\n\nRole context (JSON):\n{role}\n\nUser skills/context (JSON):\n{context}"
    ))
}
