//! Minimal Google Gemini API client.
//!
//! This crate provides a focused client for the Generative Language
//! `generateContent` endpoint with:
//! - Role-tagged conversation contents and a system instruction
//! - Generation parameters (temperature, top-k, top-p, max output tokens)
//! - Typed, priority-ordered matching of the known response shapes

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Errors that can occur when using the Gemini client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("API key not configured")]
    NoApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Gemini API client.
#[derive(Clone)]
pub struct Gemini {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl Gemini {
    /// Create a new Gemini client with the given API key.
    ///
    /// The key is transported as the `key` query parameter, which is how
    /// the Generative Language API authenticates requests. It should come
    /// from process configuration, never from page-visible source.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .connect_timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("Failed to build HTTP client"),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create a Gemini client from the GEMINI_API_KEY environment variable.
    pub fn from_env() -> Result<Self, Error> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| Error::NoApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Set the default model for this client.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Send a generation request and return the matched reply shape.
    pub async fn generate(&self, request: Request) -> Result<Reply, Error> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        let api_request = build_api_request(&request);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(format!("{API_BASE}/models/{model}:generateContent"))
            .query(&[("key", self.api_key.as_str())])
            .headers(headers)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: body,
            });
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        Ok(Reply::from_value(value))
    }
}

// ============================================================================
// Public types
// ============================================================================

/// A generation request to send to Gemini.
#[derive(Debug, Clone)]
pub struct Request {
    pub model: Option<String>,
    pub system: Option<String>,
    pub contents: Vec<Content>,
    pub temperature: Option<f32>,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Request {
    /// Create a new request with the given conversation contents.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            model: None,
            system: None,
            contents,
            temperature: None,
            top_k: None,
            top_p: None,
            max_output_tokens: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

/// One role-tagged text turn in a conversation.
#[derive(Debug, Clone)]
pub struct Content {
    pub role: Role,
    pub text: String,
}

impl Content {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model (assistant) turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// The role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

/// The known response shapes, matched in declaration order.
///
/// The Generative Language response schema is not fully standardized
/// across API variants, so the reply is probed against each known shape
/// in priority order. When none match, the raw payload is retained for
/// diagnostics instead of being silently dropped.
#[derive(Debug, Clone)]
pub enum Reply {
    /// `candidates[0].content.parts[0].text` (current v1beta shape).
    CandidateParts(String),
    /// `candidates[0].content.text` (older candidate shape).
    CandidateText(String),
    /// Top-level `text` field.
    FlatText(String),
    /// `choices[0].text` (completions-style shape).
    ChoiceText(String),
    /// No known shape matched; raw payload kept for diagnostics.
    Unrecognized(serde_json::Value),
}

impl Reply {
    /// The extracted reply text, if any known shape matched.
    pub fn text(&self) -> Option<&str> {
        match self {
            Reply::CandidateParts(text)
            | Reply::CandidateText(text)
            | Reply::FlatText(text)
            | Reply::ChoiceText(text) => Some(text),
            Reply::Unrecognized(_) => None,
        }
    }

    /// Probe a raw response body against the known shapes in priority order.
    pub fn from_value(value: serde_json::Value) -> Self {
        if let Ok(shape) = serde_json::from_value::<CandidatePartsShape>(value.clone()) {
            if let Some(text) = shape.first_part_text() {
                return Reply::CandidateParts(text);
            }
        }
        if let Ok(shape) = serde_json::from_value::<CandidateTextShape>(value.clone()) {
            if let Some(text) = shape.first_text() {
                return Reply::CandidateText(text);
            }
        }
        if let Ok(FlatTextShape { text: Some(text) }) =
            serde_json::from_value::<FlatTextShape>(value.clone())
        {
            return Reply::FlatText(text);
        }
        if let Ok(shape) = serde_json::from_value::<ChoicesShape>(value.clone()) {
            if let Some(text) = shape.first_text() {
                return Reply::ChoiceText(text);
            }
        }

        tracing::debug!("unrecognized Gemini response shape");
        Reply::Unrecognized(value)
    }
}

// ============================================================================
// Internal API types
// ============================================================================

fn build_api_request(request: &Request) -> ApiRequest {
    ApiRequest {
        system_instruction: request.system.as_ref().map(|text| ApiContent {
            role: None,
            parts: vec![ApiPart { text: text.clone() }],
        }),
        contents: request
            .contents
            .iter()
            .map(|c| ApiContent {
                role: Some(match c.role {
                    Role::User => "user".to_string(),
                    Role::Model => "model".to_string(),
                }),
                parts: vec![ApiPart {
                    text: c.text.clone(),
                }],
            })
            .collect(),
        generation_config: ApiGenerationConfig {
            temperature: request.temperature,
            top_k: request.top_k,
            top_p: request.top_p,
            max_output_tokens: request.max_output_tokens,
        },
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent>,
    contents: Vec<ApiContent>,
    generation_config: ApiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct ApiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ApiPart>,
}

#[derive(Debug, Serialize)]
struct ApiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

// Response probe shapes. Each is deliberately loose: missing fields must
// fail the probe, not the whole parse, so everything is Option/Vec based.

#[derive(Debug, Deserialize)]
struct CandidatePartsShape {
    candidates: Vec<PartsCandidate>,
}

#[derive(Debug, Deserialize)]
struct PartsCandidate {
    content: PartsContent,
}

#[derive(Debug, Deserialize)]
struct PartsContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    text: Option<String>,
}

impl CandidatePartsShape {
    fn first_part_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Deserialize)]
struct CandidateTextShape {
    candidates: Vec<TextCandidate>,
}

#[derive(Debug, Deserialize)]
struct TextCandidate {
    content: FlatTextShape,
}

impl CandidateTextShape {
    fn first_text(self) -> Option<String> {
        self.candidates.into_iter().next()?.content.text
    }
}

#[derive(Debug, Deserialize)]
struct FlatTextShape {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoicesShape {
    choices: Vec<FlatTextShape>,
}

impl ChoicesShape {
    fn first_text(self) -> Option<String> {
        self.choices.into_iter().next()?.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = Gemini::new("test-key");
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_client_with_model() {
        let client = Gemini::new("test-key").with_model("gemini-2.0-pro");
        assert_eq!(client.model, "gemini-2.0-pro");
    }

    #[test]
    fn test_request_builder() {
        let request = Request::new(vec![Content::user("Hello")])
            .with_system("You are a tour guide")
            .with_temperature(0.7)
            .with_top_k(1)
            .with_top_p(0.8)
            .with_max_output_tokens(500);

        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.top_k, Some(1));
        assert_eq!(request.top_p, Some(0.8));
        assert_eq!(request.max_output_tokens, Some(500));
        assert!(request.system.is_some());
    }

    #[test]
    fn test_content_roles() {
        let user = Content::user("Hello");
        assert_eq!(user.role, Role::User);

        let model = Content::model("Hi there");
        assert_eq!(model.role, Role::Model);
    }

    #[test]
    fn test_reply_candidate_parts() {
        let value = json!({
            "candidates": [{"content": {"parts": [{"text": "Namaste"}]}}]
        });
        let reply = Reply::from_value(value);
        assert!(matches!(reply, Reply::CandidateParts(_)));
        assert_eq!(reply.text(), Some("Namaste"));
    }

    #[test]
    fn test_reply_candidate_text() {
        let value = json!({
            "candidates": [{"content": {"text": "Namaste"}}]
        });
        let reply = Reply::from_value(value);
        assert!(matches!(reply, Reply::CandidateText(_)));
        assert_eq!(reply.text(), Some("Namaste"));
    }

    #[test]
    fn test_reply_flat_text() {
        let reply = Reply::from_value(json!({"text": "Namaste"}));
        assert!(matches!(reply, Reply::FlatText(_)));
        assert_eq!(reply.text(), Some("Namaste"));
    }

    #[test]
    fn test_reply_choices() {
        let reply = Reply::from_value(json!({"choices": [{"text": "Namaste"}]}));
        assert!(matches!(reply, Reply::ChoiceText(_)));
        assert_eq!(reply.text(), Some("Namaste"));
    }

    #[test]
    fn test_reply_priority_order() {
        // When multiple shapes are present, the candidates/parts shape wins.
        let value = json!({
            "candidates": [{"content": {"parts": [{"text": "from parts"}]}}],
            "text": "from flat",
            "choices": [{"text": "from choices"}]
        });
        assert_eq!(Reply::from_value(value).text(), Some("from parts"));
    }

    #[test]
    fn test_reply_unrecognized_keeps_payload() {
        let value = json!({"error": {"message": "quota exceeded"}});
        let reply = Reply::from_value(value.clone());
        match reply {
            Reply::Unrecognized(raw) => assert_eq!(raw, value),
            other => panic!("expected Unrecognized, got {other:?}"),
        }
    }

    #[test]
    fn test_reply_empty_candidates_falls_through() {
        // An empty candidates array must not satisfy the candidate shapes.
        let reply = Reply::from_value(json!({"candidates": [], "text": "fallback"}));
        assert!(matches!(reply, Reply::FlatText(_)));
        assert_eq!(reply.text(), Some("fallback"));
    }

    #[test]
    fn test_api_request_serialization() {
        let request = Request::new(vec![Content::user("Hello"), Content::model("Hi")])
            .with_system("persona")
            .with_temperature(0.7)
            .with_top_k(1)
            .with_top_p(0.8)
            .with_max_output_tokens(500);

        let value = serde_json::to_value(build_api_request(&request)).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][1]["role"], "model");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "persona");
        let config = &value["generationConfig"];
        assert!((config["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((config["topP"].as_f64().unwrap() - 0.8).abs() < 1e-6);
        assert_eq!(config["topK"], 1);
        assert_eq!(config["maxOutputTokens"], 500);
    }
}
