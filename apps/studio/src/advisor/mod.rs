/// AI advisory client: suggestion text for the summary and for work-experience
/// bullets, produced by a hosted chat-completion API.
///
/// The editor never depends on this module being available. When AI is turned
/// off, `AppState::advisor` is `None` and the suggestion endpoints say so.
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::cv::{Document, WorkExperience};

pub mod handlers;
pub mod prompts;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Model used for every suggestion request.
pub const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.3;
const MAX_RETRIES: u32 = 3;
const SUMMARY_MAX_TOKENS: u32 = 500;
const BULLETS_MAX_TOKENS: u32 = 600;
const MAX_SUMMARY_OPTIONS: usize = 3;
const MAX_BULLETS: usize = 8;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Completion returned empty content")]
    EmptyContent,

    #[error("AI suggestions are disabled")]
    Disabled,
}

/// Source of suggestion text. Swappable so the handlers can be exercised
/// without a network.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest_summary(&self, doc: &Document) -> Result<Vec<String>, AdvisorError>;

    async fn suggest_bullets(
        &self,
        experience: &WorkExperience,
        doc: &Document,
    ) -> Result<Vec<String>, AdvisorError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat-completions backend with retry on rate limiting and server errors.
#[derive(Clone)]
pub struct OpenAiAdvisor {
    client: Client,
    api_key: String,
}

impl OpenAiAdvisor {
    pub fn new(api_key: String) -> Result<Self, AdvisorError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(60)).build()?,
            api_key,
        })
    }

    async fn chat(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, AdvisorError> {
        let body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let mut last_error: Option<AdvisorError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Suggestion request attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(OPENAI_URL)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(AdvisorError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let text = response.text().await.unwrap_or_default();
                warn!("Suggestion API returned {}: {}", status, text);
                last_error = Some(AdvisorError::Api {
                    status: status.as_u16(),
                    message: text,
                });
                continue;
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&text)
                    .map(|e| e.error.message)
                    .unwrap_or(text);
                return Err(AdvisorError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: ChatResponse = response.json().await?;
            let content = first_choice_text(parsed).ok_or(AdvisorError::EmptyContent)?;
            debug!("Suggestion request succeeded ({} chars)", content.len());
            return Ok(content);
        }

        Err(last_error.unwrap_or(AdvisorError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl SuggestionProvider for OpenAiAdvisor {
    async fn suggest_summary(&self, doc: &Document) -> Result<Vec<String>, AdvisorError> {
        let prompt = prompts::summary_prompt(doc)?;
        let content = self
            .chat(prompts::SUMMARY_SYSTEM, &prompt, SUMMARY_MAX_TOKENS)
            .await?;
        Ok(parse_summary_options(&content))
    }

    async fn suggest_bullets(
        &self,
        experience: &WorkExperience,
        doc: &Document,
    ) -> Result<Vec<String>, AdvisorError> {
        let prompt = prompts::bullets_prompt(experience, doc)?;
        let content = self
            .chat(prompts::BULLETS_SYSTEM, &prompt, BULLETS_MAX_TOKENS)
            .await?;
        Ok(parse_bullets(&content))
    }
}

fn first_choice_text(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn summary_separator() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)\n\s*\n|\n-\s|^-").ok())
        .as_ref()
}

fn bullet_marker() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-•]\s*").ok()).as_ref()
}

/// Splits a completion into separate summary options: paragraphs, or dash
/// items. At most three are kept.
pub fn parse_summary_options(content: &str) -> Vec<String> {
    let parts: Vec<&str> = match summary_separator() {
        Some(re) => re.split(content).collect(),
        None => content.split("\n\n").collect(),
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_SUMMARY_OPTIONS)
        .map(str::to_string)
        .collect()
}

/// One bullet per non-empty line, list markers stripped. At most eight.
pub fn parse_bullets(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| match bullet_marker() {
            Some(re) => re.replace(line.trim(), "").trim().to_string(),
            None => line.trim().to_string(),
        })
        .filter(|s| !s.is_empty())
        .take(MAX_BULLETS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summary_paragraphs() {
        let content = "Analytical mathematician with a record of firsts.\n\n\
                       Pioneering programmer who formalised looping.\n\n\
                       Third option.\n\nFourth option.";
        let options = parse_summary_options(content);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0], "Analytical mathematician with a record of firsts.");
        assert_eq!(options[2], "Third option.");
    }

    #[test]
    fn test_parse_summary_dash_items() {
        let content = "- First summary.\n- Second summary.";
        let options = parse_summary_options(content);
        assert_eq!(options, vec!["First summary.", "Second summary."]);
    }

    #[test]
    fn test_parse_bullets_strips_markers() {
        let content = "- Cut report runtime 40% by caching joins\n\n• Mentored 4 engineers\nShipped v2 in 6 weeks";
        let bullets = parse_bullets(content);
        assert_eq!(
            bullets,
            vec![
                "Cut report runtime 40% by caching joins",
                "Mentored 4 engineers",
                "Shipped v2 in 6 weeks"
            ]
        );
    }

    #[test]
    fn test_parse_bullets_caps_at_eight() {
        let content = (0..12).map(|i| format!("- bullet {i}")).collect::<Vec<_>>().join("\n");
        assert_eq!(parse_bullets(&content).len(), 8);
    }

    #[test]
    fn test_first_choice_text_trims_and_rejects_empty() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  hello \n"}}]}"#).unwrap();
        assert_eq!(first_choice_text(response).as_deref(), Some("hello"));

        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert!(first_choice_text(response).is_none());

        let response: ChatResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(first_choice_text(response).is_none());
    }
}
