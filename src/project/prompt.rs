//! Prompt templates: the instruction text sent to the model.
//!
//! DESIGN
//! ======
//! Two fixed templates, one per request kind. The JSON envelope each template
//! asks for is the exact shape `normalize` reads, so a schema change touches
//! this file and `normalize.rs` together.
//!
//! Rendering is a single left-to-right pass: `{name}` tokens that match a
//! known placeholder are substituted, anything else (including the literal
//! braces of the JSON example) is copied through. Substituted values are
//! never rescanned, so user text containing `{metadata}` stays literal.

use serde::Serialize;

use super::{CircuitGraph, ProjectMetadata};

const PROJECT_GENERATION_TEMPLATE: &str = r#"You are an embedded systems and electronics assistant that designs complete microcontroller projects.

Create a complete hardware project for the request below.

USER REQUEST: {user_prompt}

Reply with a single JSON object of exactly this shape:
{
  "metadata": {
    "functionality": "Short description of what the project does",
    "microcontroller": "Board to use",
    "sensors": ["Sensors the project needs"],
    "actuators": ["Actuators and output devices the project needs"]
  },
  "steps": [
    "Step 1: What the request asks for",
    "Step 2: Why these components were chosen",
    "Step 3: How the circuit is laid out",
    "Step 4: How the code is structured and which libraries it uses"
  ],
  "code": "Complete firmware source with required includes, error handling and comments",
  "circuit": {
    "components": [
      { "id": "unique_id", "type": "component_type", "x": 100, "y": 100, "label": "Component Name" }
    ],
    "connections": [
      { "from": "component_id1", "to": "component_id2", "fromPin": "pin_name1", "toPin": "pin_name2" }
    ]
  }
}

The code must be complete and commented. Place circuit components and wire them the way a real board would be built.
"#;

const REPROMPT_TEMPLATE: &str = r#"You are an embedded systems and electronics assistant making an incremental change to an existing hardware project.

ORIGINAL PROJECT REQUEST: {original_prompt}

CURRENT CODE:
```
{current_code}
```

CURRENT CIRCUIT:
{circuit_config}

CURRENT PROJECT METADATA:
{metadata}

NEW REQUEST: {user_prompt}

Apply the new request to the existing project and reply with a single JSON object of exactly this shape:
{
  "steps": [
    "Step 1: What the request changes in the current implementation",
    "Step 2: The changes being made"
  ],
  "code": "The full updated code, with changes called out in comments",
  "circuit": {
    "components": [ "include only new or modified components" ],
    "connections": [ "include only new or modified connections" ]
  },
  "metadata": { "include only fields that change": "" }
}

Keep the project compatible with what already exists and address the new request directly.
"#;

/// JSON written in place of an absent circuit.
pub const EMPTY_CIRCUIT_JSON: &str = r#"{"components":[],"connections":[]}"#;
/// JSON written in place of absent metadata.
pub const EMPTY_METADATA_JSON: &str = "{}";

// =============================================================================
// CALL CONTEXT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    ProjectGeneration,
    Reprompt,
}

impl RequestKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectGeneration => "project_generation",
            Self::Reprompt => "reprompt",
        }
    }
}

/// What the project looked like before a reprompt.
#[derive(Debug, Clone, Default)]
pub struct RepromptContext {
    pub original_prompt: String,
    pub current_code: Option<String>,
    pub current_circuit: Option<CircuitGraph>,
    pub metadata: Option<ProjectMetadata>,
}

/// One AI request, built by the caller and dropped once the call returns.
#[derive(Debug, Clone)]
pub enum AiCall {
    ProjectGeneration { prompt: String },
    Reprompt { prompt: String, context: RepromptContext },
}

impl AiCall {
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::ProjectGeneration { .. } => RequestKind::ProjectGeneration,
            Self::Reprompt { .. } => RequestKind::Reprompt,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        match self {
            Self::ProjectGeneration { prompt } | Self::Reprompt { prompt, .. } => prompt,
        }
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Render the final instruction text for `call`.
#[must_use]
pub fn render(call: &AiCall) -> String {
    match call {
        AiCall::ProjectGeneration { prompt } => fill(PROJECT_GENERATION_TEMPLATE, &[("user_prompt", prompt)]),
        AiCall::Reprompt { prompt, context } => {
            let circuit = context
                .current_circuit
                .as_ref()
                .map_or_else(|| EMPTY_CIRCUIT_JSON.to_string(), to_pretty_json);
            let metadata = context
                .metadata
                .as_ref()
                .map_or_else(|| EMPTY_METADATA_JSON.to_string(), to_pretty_json);
            fill(
                REPROMPT_TEMPLATE,
                &[
                    ("original_prompt", &context.original_prompt),
                    ("current_code", context.current_code.as_deref().unwrap_or("")),
                    ("circuit_config", &circuit),
                    ("metadata", &metadata),
                    ("user_prompt", prompt),
                ],
            )
        }
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| EMPTY_METADATA_JSON.to_string())
}

/// Substitute `{name}` tokens in `template` with the matching value.
pub(crate) fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
