//! Quiz generator backed by Google's Gemini `generateContent` API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::generate::{GenerateError, QuizGenerator};
use crate::model::Quiz;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Generates quizzes by prompting a Gemini model with the tutorial content
/// and parsing the JSON it returns.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiGenerator {
    /// Generator against the public Gemini endpoint.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string(), api_key, model)
    }

    /// Generator with an endpoint override, for pointing tests at a stub.
    pub fn with_endpoint(endpoint: String, api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            model,
            api_key,
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl QuizGenerator for GeminiGenerator {
    async fn generate(&self, content: &str) -> Result<Quiz, GenerateError> {
        let text = strip_markup(content);
        if text.is_empty() {
            return Err(GenerateError::EmptyContent);
        }

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(&text) }] }],
            "generationConfig": { "response_mime_type": "application/json" },
        });

        tracing::debug!(model = %self.model, "requesting quiz generation");

        let response = self
            .http
            .post(self.request_url())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: GenerateContentResponse = response.json().await?;
        let raw = payload
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
            .ok_or_else(|| GenerateError::MalformedResponse("response has no candidates".to_string()))?;

        parse_quiz(raw)
    }
}

/// Strip HTML tags and collapse whitespace. The editor hands us markup, the
/// prompt wants plain text.
fn strip_markup(content: &str) -> String {
    let tags = regex::Regex::new(r"<[^>]+>").unwrap();
    let text = tags.replace_all(content, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn build_prompt(text: &str) -> String {
    format!(
        "Create a multiple-choice quiz for the tutorial below. Respond with JSON only, \
         shaped as {{\"easy\": [...], \"medium\": [...], \"hard\": [...]}} where each \
         entry is {{\"q\": string, \"options\": [string, ...], \"answer\": <index of the \
         correct option>}}. Write three questions per difficulty.\n\nTutorial:\n{text}"
    )
}

/// Parse the model's JSON payload, tolerating markdown code fences, then
/// repair it: malformed questions are dropped and a tier left empty fails the
/// whole generation.
fn parse_quiz(raw: &str) -> Result<Quiz, GenerateError> {
    let mut quiz: Quiz = serde_json::from_str(strip_code_fence(raw))
        .map_err(|err| GenerateError::MalformedResponse(err.to_string()))?;

    quiz.retain_well_formed();
    if let Some(tier) = quiz.empty_tier() {
        return Err(GenerateError::MissingTier(tier));
    }

    Ok(quiz)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_start().strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
