//! LLM types: provider-neutral completion trait, generation knobs, errors.
//!
//! Shared by the Gemini, Anthropic, and `OpenAI` clients. Every provider is
//! reduced to one operation: send a single prompt, get text back.

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client and gateway operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider envelope could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The model answered with no text at all.
    #[error("no text response from the model")]
    EmptyResponse,

    /// The model text was not valid JSON after fence stripping. The parser
    /// detail is kept for logs only.
    #[error("failed to parse AI response as JSON")]
    MalformedJson { detail: String },
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::EmptyResponse => "E_EMPTY_RESPONSE",
            Self::MalformedJson { .. } => "E_MALFORMED_JSON",
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. } | Self::EmptyResponse | Self::MalformedJson { .. }
        )
    }
}

// =============================================================================
// GENERATION CONFIG
// =============================================================================

/// Sampling parameters sent with every completion. Fixed per process; callers
/// of the gateway never choose them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

pub const DEFAULT_GENERATION: GenerationConfig =
    GenerationConfig { temperature: 0.7, top_p: 0.95, top_k: 40, max_output_tokens: 8192 };

impl Default for GenerationConfig {
    fn default() -> Self {
        DEFAULT_GENERATION
    }
}

// =============================================================================
// LLM COMPLETE TRAIT
// =============================================================================

/// Provider-neutral async trait for one-shot text completion. Enables mocking
/// in tests.
#[async_trait::async_trait]
pub trait LlmComplete: Send + Sync {
    /// Send `prompt` as a single user turn and return the model's raw text.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the provider answers with
    /// a non-success status, or the provider envelope is malformed.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
