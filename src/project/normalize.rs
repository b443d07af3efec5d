//! Response normalizer: untyped model JSON in, fixed-schema response out.
//!
//! DESIGN
//! ======
//! The model is asked for a specific envelope but may omit fields, send them
//! in the wrong shape, or report an error instead. `normalize` never panics
//! and never returns a bare error: every outcome is a `NormalizedResponse`
//! with a non-empty story in `steps`.
//!
//! Field rules follow JavaScript truthiness on the wire: an empty `code`
//! string, an empty `error` string, or `null` count as absent. The four
//! envelope fields are independent; one in the wrong shape is dropped and
//! the rest still come through.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{CircuitComponent, CircuitConnection, CircuitGraph, MetadataUpdate};

pub const DEFAULT_STEPS: [&str; 2] = ["Analyzed your request", "Generated code and circuit based on requirements"];

// =============================================================================
// TYPES
// =============================================================================

/// A successfully extracted project update. Every field but `steps` is
/// present only when the model supplied it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit: Option<CircuitGraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataUpdate>,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The model answered with an explicit `error` field.
    ModelReported,
    /// The answer was not a JSON object at all.
    Normalization,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFailure {
    #[serde(skip)]
    pub kind: FailureKind,
    pub error: String,
    pub steps: Vec<String>,
}

/// Outcome of normalizing one model answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResponse {
    Project(ProjectResponse),
    Failed(ResponseFailure),
}

impl NormalizedResponse {
    #[must_use]
    pub fn steps(&self) -> &[String] {
        match self {
            Self::Project(p) => &p.steps,
            Self::Failed(f) => &f.steps,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Project(_) => None,
            Self::Failed(f) => Some(&f.error),
        }
    }
}

// =============================================================================
// NORMALIZE
// =============================================================================

/// Convert the gateway's parsed JSON into the project response schema.
#[must_use]
pub fn normalize(value: &Value) -> NormalizedResponse {
    let Some(obj) = value.as_object() else {
        return failed(FailureKind::Normalization, format!("expected a JSON object, got {}", json_kind(value)));
    };

    if let Some(error) = model_error(obj) {
        return NormalizedResponse::Failed(ResponseFailure {
            kind: FailureKind::ModelReported,
            steps: vec![format!("Error: {error}")],
            error,
        });
    }

    NormalizedResponse::Project(extract(obj))
}

fn failed(kind: FailureKind, message: String) -> NormalizedResponse {
    tracing::warn!(error = %message, "normalize: response rejected");
    NormalizedResponse::Failed(ResponseFailure { kind, steps: vec![message.clone()], error: message })
}

fn model_error(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Each top-level field is read on its own. A misshaped field is dropped
/// with a warning and never takes the others down with it.
fn extract(obj: &Map<String, Value>) -> ProjectResponse {
    let code = match present(obj, "code") {
        None => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => dropped("code", &format!("expected a string, got {}", json_kind(other))),
    };

    let circuit = match present(obj, "circuit") {
        None => None,
        Some(Value::Object(circuit)) => match (
            list_field::<CircuitComponent>(circuit, "components"),
            list_field::<CircuitConnection>(circuit, "connections"),
        ) {
            (Ok(components), Ok(connections)) => Some(CircuitGraph { components, connections }),
            (Err(reason), _) | (_, Err(reason)) => dropped("circuit", &reason),
        },
        Some(other) => dropped("circuit", &format!("expected an object, got {}", json_kind(other))),
    };

    let metadata = match present(obj, "metadata") {
        None => None,
        Some(Value::Object(meta)) => Some(MetadataUpdate {
            functionality: text_field(meta, "functionality"),
            microcontroller: text_field(meta, "microcontroller"),
            sensors: optional_list(meta, "sensors"),
            actuators: optional_list(meta, "actuators"),
        }),
        Some(other) => dropped("metadata", &format!("expected an object, got {}", json_kind(other))),
    };

    ProjectResponse { code, circuit, metadata, steps: steps(obj.get("steps")) }
}

fn dropped<T>(field: &str, reason: &str) -> Option<T> {
    tracing::warn!(field, reason, "normalize: dropping misshaped field");
    None
}

/// Steps arrive as an array, as one delimited string, or not at all.
fn steps(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(item_text).collect(),
        Some(Value::String(s)) if !s.is_empty() => s
            .split(['\n', ','])
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(str::to_string)
            .collect(),
        _ => DEFAULT_STEPS.iter().map(|s| (*s).to_string()).collect(),
    }
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match present(obj, key)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => dropped(&format!("metadata.{key}"), &format!("expected a string, got {}", json_kind(other))),
    }
}

/// Sensor and actuator names: non-string entries are stringified, nulls skipped.
fn optional_list(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match present(obj, key)? {
        Value::Array(items) => Some(items.iter().filter_map(item_text).collect()),
        other => dropped(&format!("metadata.{key}"), &format!("expected an array, got {}", json_kind(other))),
    }
}

/// Decode the array at `key`; a missing list is empty. Entries that are not
/// objects are skipped.
fn list_field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Result<Vec<T>, String> {
    match present(obj, key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(|item| {
                serde_json::from_value(item.clone())
                    .map_err(|e| tracing::warn!(key, error = %e, "normalize: skipping circuit entry"))
                    .ok()
            })
            .collect()),
        Some(other) => Err(format!("`{key}`: expected an array, got {}", json_kind(other))),
    }
}

fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
