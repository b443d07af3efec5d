//! Google Gemini `generateContent` client.
//!
//! Thin HTTP wrapper for `/models/{model}:generateContent`. The prompt goes
//! out as a single user turn; every text part of the first candidate is
//! concatenated on the way back. Pure parsing in `parse_response` for
//! testability.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::LlmTimeouts;
use super::types::{GenerationConfig, LlmError};

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn complete(&self, model: &str, generation: &GenerationConfig, prompt: &str) -> Result<String, LlmError> {
        let body = build_request(generation, prompt);
        let url = format!("{}/models/{model}:generateContent", self.base_url);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: [ApiContent<'a>; 1],
    generation_config: ApiGenerationConfig,
}

#[derive(Serialize)]
struct ApiContent<'a> {
    role: &'static str,
    parts: [ApiPart<'a>; 1],
}

#[derive(Serialize)]
struct ApiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn build_request<'a>(generation: &GenerationConfig, prompt: &'a str) -> ApiRequest<'a> {
    ApiRequest {
        contents: [ApiContent { role: "user", parts: [ApiPart { text: prompt }] }],
        generation_config: ApiGenerationConfig {
            temperature: generation.temperature,
            top_p: generation.top_p,
            top_k: generation.top_k,
            max_output_tokens: generation.max_output_tokens,
        },
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Extract the concatenated text of the first candidate. A response with no
/// candidates yields an empty string; the gateway treats that as an empty
/// model answer.
fn parse_response(json: &str) -> Result<String, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    if let Some(reason) = api.prompt_feedback.and_then(|f| f.block_reason) {
        tracing::warn!(%reason, "gemini: prompt blocked");
    }

    let text = api
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(text)
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
