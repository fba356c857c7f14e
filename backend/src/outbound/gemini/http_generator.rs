//! Reqwest-backed Gemini `generateContent` adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ContentGenerator, ContentGeneratorError};
use crate::outbound::body_preview;

/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
/// Generation is slow; allow well beyond the other remote calls.
pub const DEFAULT_GEMINI_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Content generator adapter for the Gemini REST API.
pub struct GeminiHttpGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiHttpGenerator {
    /// Build an adapter for `model` against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        api_key: impl Into<String>,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: generate_endpoint(model),
            api_key: api_key.into(),
        })
    }
}

fn generate_endpoint(model: &str) -> String {
    format!("{DEFAULT_GEMINI_BASE_URL}v1beta/models/{model}:generateContent")
}

fn extract_text(response: GenerateResponse) -> Result<String, ContentGeneratorError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ContentGeneratorError::empty_response());
    }
    Ok(text)
}

#[async_trait]
impl ContentGenerator for GeminiHttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ContentGeneratorError> {
        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };
        let response = self
            .client
            .post(self.endpoint.as_str())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|error| ContentGeneratorError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| ContentGeneratorError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: GenerateResponse = serde_json::from_slice(body.as_ref()).map_err(|error| {
            ContentGeneratorError::decode(format!("invalid Gemini JSON payload: {error}"))
        })?;
        extract_text(decoded)
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ContentGeneratorError {
    ContentGeneratorError::transport(format!(
        "status {}: {}",
        status.as_u16(),
        body_preview(body)
    ))
}
