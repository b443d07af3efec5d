//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the live project sessions and the LLM client, or the error that
//! kept the client from being built. Sessions are in memory only and are
//! lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::llm::LlmComplete;
use crate::llm::types::LlmError;
use crate::services::generation::ProjectSession;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<RwLock<HashMap<Uuid, ProjectSession>>>,
    /// LLM client, or the startup config error every AI call reports instead.
    pub llm: Result<Arc<dyn LlmComplete>, LlmError>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Result<Arc<dyn LlmComplete>, LlmError>) -> Self {
        Self { projects: Arc::new(RwLock::new(HashMap::new())), llm }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
