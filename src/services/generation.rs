//! Generation service: per-project sessions driving the AI pipeline.
//!
//! DESIGN
//! ======
//! A session owns one `ProjectState` and threads it through
//! `project::merge::apply` after each AI call. The sessions lock is never
//! held across the network round trip: context is snapshotted, the lock is
//! released, and the merge reacquires it. Overlapping reprompts on the same
//! project are therefore not serialized and merge in completion order.
//!
//! Call-level failures (transport, empty or malformed reply) are logged into
//! the session's step log and returned to the caller. Model-reported
//! failures are ordinary responses and only add their steps.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::llm::gateway::call_ai;
use crate::llm::types::LlmError;
use crate::project::normalize::NormalizedResponse;
use crate::project::prompt::{AiCall, RepromptContext};
use crate::project::validate::{self, ResourceEstimates, ValidationReport};
use crate::project::{DEFAULT_MICROCONTROLLER, ProjectState, merge};
use crate::state::AppState;

pub const DEFAULT_LANGUAGE: &str = "cpp";

const STEP_ANALYZING: &str = "Analyzing your request for a hardware project...";
const STEP_COMPLETED: &str = "Completed processing your request";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("project not found: {0}")]
    ProjectNotFound(Uuid),
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("AI request failed: {source}")]
    Llm { project_id: Uuid, source: LlmError },
}

impl GenerationError {
    /// The project the failure was recorded against, if any.
    #[must_use]
    pub fn project_id(&self) -> Option<Uuid> {
        match self {
            Self::ProjectNotFound(id) | Self::Llm { project_id: id, .. } => Some(*id),
            Self::EmptyPrompt => None,
        }
    }
}

impl ErrorCode for GenerationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ProjectNotFound(_) => "E_PROJECT_NOT_FOUND",
            Self::EmptyPrompt => "E_EMPTY_PROMPT",
            Self::Llm { source, .. } => source.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Llm { source, .. } if source.retryable())
    }
}

/// One in-memory project conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSession {
    pub id: Uuid,
    /// The prompt that started the project; reused as context on reprompts.
    pub prompt: String,
    pub language: String,
    #[serde(flatten)]
    pub state: ProjectState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub prompt: String,
    pub step_count: usize,
    /// Most recent progress line, e.g. an error from the last turn.
    pub last_step: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectValidation {
    pub microcontroller: String,
    pub language: String,
    pub resources: ResourceEstimates,
    #[serde(flatten)]
    pub report: ValidationReport,
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create a project and run the initial generation.
///
/// The session is kept even when the call fails, with the failure in its
/// step log.
///
/// # Errors
///
/// `EmptyPrompt`, or `Llm` when the AI call fails or the LLM was never
/// configured.
pub async fn start_project(state: &AppState, prompt: &str) -> Result<ProjectSession, GenerationError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(GenerationError::EmptyPrompt);
    }

    let id = Uuid::new_v4();
    let session = ProjectSession {
        id,
        prompt: prompt.to_string(),
        language: DEFAULT_LANGUAGE.to_string(),
        state: ProjectState { steps: [STEP_ANALYZING].into_iter().collect(), ..ProjectState::default() },
    };
    state.projects.write().await.insert(id, session);
    info!(%id, prompt_len = prompt.len(), "project: started");

    let result = run_ai(state, &AiCall::ProjectGeneration { prompt: prompt.to_string() }).await;

    let mut projects = state.projects.write().await;
    let session = projects.get_mut(&id).ok_or(GenerationError::ProjectNotFound(id))?;
    match result {
        Ok(response) => {
            session.state = merge::apply(std::mem::take(&mut session.state), &response);
            Ok(session.clone())
        }
        Err(e) => {
            warn!(%id, error = %e, "project: initial generation failed");
            session.state.steps.append(format!("Error generating project: {e}"));
            Err(GenerationError::Llm { project_id: id, source: e })
        }
    }
}

/// Apply a follow-up instruction to an existing project.
///
/// # Errors
///
/// `EmptyPrompt`, `ProjectNotFound`, or `Llm` when the AI call fails or the
/// LLM was never configured.
pub async fn reprompt_project(state: &AppState, id: Uuid, prompt: &str) -> Result<ProjectSession, GenerationError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(GenerationError::EmptyPrompt);
    }

    let context = {
        let mut projects = state.projects.write().await;
        let session = projects.get_mut(&id).ok_or(GenerationError::ProjectNotFound(id))?;
        session.state.steps.append(format!("Processing your request: \"{prompt}\""));
        RepromptContext {
            original_prompt: session.prompt.clone(),
            current_code: Some(session.state.code.clone()).filter(|c| !c.is_empty()),
            current_circuit: Some(session.state.circuit.clone()),
            metadata: session.state.metadata.clone(),
        }
    };
    info!(%id, prompt_len = prompt.len(), "project: reprompt");

    let call = AiCall::Reprompt { prompt: prompt.to_string(), context };
    let result = run_ai(state, &call).await;

    let mut projects = state.projects.write().await;
    let session = projects.get_mut(&id).ok_or(GenerationError::ProjectNotFound(id))?;
    match result {
        Ok(response) => {
            session.state = merge::apply(std::mem::take(&mut session.state), &response);
            // Steps are de-duplicated, so only the first successful reprompt
            // of a project logs this line.
            session.state.steps.append(STEP_COMPLETED);
            Ok(session.clone())
        }
        Err(e) => {
            warn!(%id, error = %e, "project: reprompt failed");
            session.state.steps.append(format!("Error processing your request: {e}"));
            Err(GenerationError::Llm { project_id: id, source: e })
        }
    }
}

/// One AI round trip, or the startup config error when no client exists.
async fn run_ai(state: &AppState, call: &AiCall) -> Result<NormalizedResponse, LlmError> {
    match &state.llm {
        Ok(llm) => call_ai(llm.as_ref(), call).await,
        Err(e) => Err(e.clone()),
    }
}

/// # Errors
///
/// `ProjectNotFound` for an unknown id.
pub async fn get_project(state: &AppState, id: Uuid) -> Result<ProjectSession, GenerationError> {
    state
        .projects
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or(GenerationError::ProjectNotFound(id))
}

pub async fn list_projects(state: &AppState) -> Vec<ProjectSummary> {
    let projects = state.projects.read().await;
    let mut out: Vec<ProjectSummary> = projects
        .values()
        .map(|s| ProjectSummary {
            id: s.id,
            prompt: s.prompt.clone(),
            step_count: s.state.steps.len(),
            last_step: s.state.steps.as_slice().last().cloned(),
        })
        .collect();
    out.sort_by_key(|s| s.id);
    out
}

/// Run the heuristic validator over a project's current code.
///
/// The board comes from the project metadata, falling back to the default
/// microcontroller. `language` overrides the session language.
///
/// # Errors
///
/// `ProjectNotFound` for an unknown id.
pub async fn validate_project(
    state: &AppState,
    id: Uuid,
    language: Option<&str>,
) -> Result<ProjectValidation, GenerationError> {
    let session = get_project(state, id).await?;

    let name = session
        .state
        .metadata
        .as_ref()
        .map_or(DEFAULT_MICROCONTROLLER, |m| m.microcontroller.as_str());
    let board_id = validate::resolve_board(name).map_or(name, |b| b.id);
    let language = language.unwrap_or(session.language.as_str());

    let resources = validate::estimate_resources(&session.state.code, board_id);
    let report = validate::validate_code(&session.state.code, board_id, &resources.ram, &resources.flash, language);

    Ok(ProjectValidation { microcontroller: board_id.to_string(), language: language.to_string(), resources, report })
}

#[cfg(test)]
#[path = "generation_test.rs"]
mod tests;
