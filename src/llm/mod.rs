//! LLM: multi-provider text completion plus the JSON gateway on top of it.
//!
//! DESIGN
//! ======
//! Configured from environment variables. The `LlmClient` dispatches to
//! Gemini, Anthropic, or `OpenAI` based on `LLM_PROVIDER`; the `gateway`
//! module turns raw completion text into a parsed JSON value.

pub mod anthropic;
pub mod config;
pub mod gateway;
pub mod gemini;
pub mod openai;
pub mod types;

use config::{LlmConfig, LlmProviderKind};
pub use types::LlmComplete;
use types::{GenerationConfig, LlmError};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client that dispatches to the configured provider.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: LlmProvider,
    provider: LlmProviderKind,
    model: String,
    generation: GenerationConfig,
}

enum LlmProvider {
    Gemini(gemini::GeminiClient),
    Anthropic(anthropic::AnthropicClient),
    OpenAi(openai::OpenAiClient),
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing, a value fails to parse, or
    /// the HTTP client fails to build.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = match config.provider {
            LlmProviderKind::Gemini => {
                LlmProvider::Gemini(gemini::GeminiClient::new(config.api_key, config.base_url, config.timeouts)?)
            }
            LlmProviderKind::Anthropic => {
                LlmProvider::Anthropic(anthropic::AnthropicClient::new(config.api_key, config.base_url, config.timeouts)?)
            }
            LlmProviderKind::OpenAi => LlmProvider::OpenAi(openai::OpenAiClient::new(
                config.api_key,
                config.openai_mode,
                config.base_url,
                config.timeouts,
            )?),
        };
        Ok(Self { inner, provider: config.provider, model: config.model, generation: config.generation })
    }

    /// Return the configured model name (e.g. `"gemini-2.0-flash"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn provider(&self) -> LlmProviderKind {
        self.provider
    }
}

#[async_trait::async_trait]
impl LlmComplete for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        match &self.inner {
            LlmProvider::Gemini(c) => c.complete(&self.model, &self.generation, prompt).await,
            LlmProvider::Anthropic(c) => c.complete(&self.model, &self.generation, prompt).await,
            LlmProvider::OpenAi(c) => c.complete(&self.model, &self.generation, prompt).await,
        }
    }
}
