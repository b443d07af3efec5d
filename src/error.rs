//! Error classification shared by the gateway, services, and routes.
//!
//! DESIGN
//! ======
//! Each module keeps its own `thiserror` enum. This trait gives every one of
//! them a stable machine-readable code and a retry hint so the HTTP layer can
//! render a uniform error body without matching on foreign types. The hint is
//! advisory: nothing in this crate retries on its own.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON body returned for every failed API request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<uuid::Uuid>,
}

impl ErrorBody {
    pub fn from_error(err: &impl ErrorCode) -> Self {
        Self { error: err.error_code(), message: err.to_string(), retryable: err.retryable(), project_id: None }
    }

    #[must_use]
    pub fn with_project(mut self, project_id: uuid::Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

/// A status code paired with an [`ErrorBody`], usable as a handler error.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
