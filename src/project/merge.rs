//! Project state merger: folds one normalized response into the state.
//!
//! Each field merges on its own; nothing rolls back.
//!
//! - `code`: replaced wholesale when present.
//! - `circuit`: replaced wholesale when present. Reprompt responses are asked
//!   for "only new or modified" entries, yet they still replace the whole
//!   graph here; components the model does not re-list are dropped.
//! - `metadata`: supplied fields overwrite, the rest are kept. Created from
//!   defaults on first arrival.
//! - `steps`: appended in order, skipping exact duplicates.

use super::ProjectState;
use super::normalize::NormalizedResponse;

/// Apply `response` to `state` and return the new state.
#[must_use]
pub fn apply(mut state: ProjectState, response: &NormalizedResponse) -> ProjectState {
    state.steps.extend(response.steps().iter().map(String::as_str));

    let NormalizedResponse::Project(update) = response else {
        return state;
    };

    if let Some(code) = &update.code {
        state.code.clone_from(code);
    }

    if let Some(circuit) = &update.circuit {
        state.circuit = circuit.clone();
    }

    if let Some(metadata) = &update.metadata {
        state.metadata = Some(match state.metadata.take() {
            Some(base) => metadata.apply_to(base),
            None => metadata.with_defaults(),
        });
    }

    state
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
