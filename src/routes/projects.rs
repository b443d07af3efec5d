//! Project routes: create, reprompt, inspect, and validate sessions.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ErrorBody};
use crate::llm::types::LlmError;
use crate::services::generation::{self, GenerationError, ProjectSession, ProjectSummary, ProjectValidation};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PromptBody {
    pub prompt: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidateProjectBody {
    #[serde(default)]
    pub language: Option<String>,
}

pub(crate) fn generation_error_to_status(err: &GenerationError) -> StatusCode {
    match err {
        GenerationError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
        GenerationError::EmptyPrompt => StatusCode::BAD_REQUEST,
        GenerationError::Llm {
            source: LlmError::MissingApiKey { .. } | LlmError::ConfigParse(_) | LlmError::HttpClientBuild(_),
            ..
        } => StatusCode::SERVICE_UNAVAILABLE,
        GenerationError::Llm { .. } => StatusCode::BAD_GATEWAY,
    }
}

fn api_error(err: &GenerationError) -> ApiError {
    let mut body = ErrorBody::from_error(err);
    if let Some(id) = err.project_id() {
        body = body.with_project(id);
    }
    ApiError { status: generation_error_to_status(err), body }
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(body): Json<PromptBody>,
) -> Result<(StatusCode, Json<ProjectSession>), ApiError> {
    let session = generation::start_project(&state, &body.prompt)
        .await
        .map_err(|e| api_error(&e))?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_projects(State(state): State<AppState>) -> Json<Vec<ProjectSummary>> {
    Json(generation::list_projects(&state).await)
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectSession>, ApiError> {
    generation::get_project(&state, id)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

pub async fn reprompt_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PromptBody>,
) -> Result<Json<ProjectSession>, ApiError> {
    generation::reprompt_project(&state, id, &body.prompt)
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

pub async fn validate_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ValidateProjectBody>,
) -> Result<Json<ProjectValidation>, ApiError> {
    generation::validate_project(&state, id, body.language.as_deref())
        .await
        .map(Json)
        .map_err(|e| api_error(&e))
}

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;
