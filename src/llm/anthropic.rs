//! Anthropic Messages API client.
//!
//! Thin HTTP wrapper for `/v1/messages`. Pure parsing in `parse_response` for
//! testability.

use std::time::Duration;

use super::config::LlmTimeouts;
use super::types::{GenerationConfig, LlmError};

const API_VERSION: &str = "2023-06-01";

// =============================================================================
// CLIENT
// =============================================================================

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn complete(&self, model: &str, generation: &GenerationConfig, prompt: &str) -> Result<String, LlmError> {
        let body = build_request(model, generation, prompt);

        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_k: u32,
    messages: [ApiMessage<'a>; 1],
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    /// Thinking, tool use, and future block types carry no answer text.
    #[serde(other)]
    Other,
}

// Anthropic rejects requests carrying both temperature and top_p, so top_p
// is left at the provider default.
fn build_request<'a>(model: &'a str, generation: &GenerationConfig, prompt: &'a str) -> ApiRequest<'a> {
    ApiRequest {
        model,
        max_tokens: generation.max_output_tokens,
        temperature: generation.temperature,
        top_k: generation.top_k,
        messages: [ApiMessage { role: "user", content: prompt }],
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<String, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    if api.stop_reason.as_deref() == Some("max_tokens") {
        tracing::warn!("anthropic: response truncated at max_tokens");
    }

    Ok(api
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
