//! AI gateway: one prompt in, one parsed JSON value out.
//!
//! DESIGN
//! ======
//! Exactly one completion per call. No retries, no streaming. The model is
//! asked for bare JSON but routinely wraps it in Markdown fences, so the
//! text is unfenced and trimmed before parsing. A parse failure is logged
//! with the parser's detail and surfaced with a generic message.

use serde_json::Value;
use tracing::{error, info};

use super::LlmComplete;
use super::types::LlmError;
use crate::project::normalize::{NormalizedResponse, normalize};
use crate::project::prompt::{AiCall, render};

/// Remove ```` ```json ```` and ```` ``` ```` markers and surrounding whitespace.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse raw model text into JSON.
///
/// # Errors
///
/// [`LlmError::EmptyResponse`] for blank text, [`LlmError::MalformedJson`]
/// when the unfenced text is not JSON.
pub fn parse_model_text(text: &str) -> Result<Value, LlmError> {
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned).map_err(|e| {
        error!(error = %e, text_len = cleaned.len(), "model response is not valid JSON");
        LlmError::MalformedJson { detail: e.to_string() }
    })
}

/// Send `prompt` and parse the reply as JSON.
///
/// # Errors
///
/// Transport and provider errors from `llm`, plus the parse errors of
/// [`parse_model_text`].
pub async fn request_json(llm: &dyn LlmComplete, prompt: &str) -> Result<Value, LlmError> {
    let text = llm.complete(prompt).await?;
    parse_model_text(&text)
}

/// Render `call`, send it, and normalize the reply.
///
/// Model-reported and normalization failures come back as
/// [`NormalizedResponse::Failed`]; only call-level failures are `Err`.
///
/// # Errors
///
/// Any error of [`request_json`].
pub async fn call_ai(llm: &dyn LlmComplete, call: &AiCall) -> Result<NormalizedResponse, LlmError> {
    let kind = call.kind().as_str();
    let prompt = render(call);
    info!(kind, instruction_len = call.prompt().len(), prompt_len = prompt.len(), "ai: sending request");

    let value = request_json(llm, &prompt).await?;
    let response = normalize(&value);

    match response.error() {
        Some(err) => info!(kind, error = err, "ai: response reported failure"),
        None => info!(kind, steps = response.steps().len(), "ai: response normalized"),
    }
    Ok(response)
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
