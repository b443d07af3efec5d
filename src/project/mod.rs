//! Project model: the code/circuit/metadata bundle a session accumulates.
//!
//! ARCHITECTURE
//! ============
//! One generation turn flows through these modules in order:
//!
//! ```text
//! instruction -> prompt::render -> llm::gateway -> normalize -> merge -> ProjectState
//! ```
//!
//! `validate` runs off to the side over the generated code. Everything here
//! is pure: no I/O, no locks, no globals. Callers own the state and thread it
//! through `merge::apply`.

pub mod merge;
pub mod normalize;
pub mod prompt;
pub mod validate;

use serde::{Deserialize, Deserializer, Serialize};

/// Board name used when the model never says which microcontroller to use.
pub const DEFAULT_MICROCONTROLLER: &str = "Arduino Uno";

// =============================================================================
// CIRCUIT GRAPH
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitComponent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub y: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitConnection {
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub from_pin: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to_pin: String,
}

/// Model output puts pins as `13` or `"D13"` and labels as `null` at random.
/// Scalars become their text form; `null` and containers become empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Coordinates as numbers or numeric strings; anything else is `0.0`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()).unwrap_or_default())
}

/// Simulated wiring diagram. Replaced wholesale whenever a response carries one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitGraph {
    #[serde(default)]
    pub components: Vec<CircuitComponent>,
    #[serde(default)]
    pub connections: Vec<CircuitConnection>,
}

// =============================================================================
// METADATA
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub functionality: String,
    pub microcontroller: String,
    pub sensors: Vec<String>,
    pub actuators: Vec<String>,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            functionality: String::new(),
            microcontroller: DEFAULT_MICROCONTROLLER.to_string(),
            sensors: Vec::new(),
            actuators: Vec::new(),
        }
    }
}

/// Metadata fields a single response actually supplied. Absent fields leave
/// the stored value untouched when merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functionality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub microcontroller: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actuators: Option<Vec<String>>,
}

impl MetadataUpdate {
    /// Overlay the supplied fields onto `base`.
    #[must_use]
    pub fn apply_to(&self, mut base: ProjectMetadata) -> ProjectMetadata {
        if let Some(functionality) = &self.functionality {
            base.functionality.clone_from(functionality);
        }
        if let Some(microcontroller) = &self.microcontroller {
            base.microcontroller.clone_from(microcontroller);
        }
        if let Some(sensors) = &self.sensors {
            base.sensors.clone_from(sensors);
        }
        if let Some(actuators) = &self.actuators {
            base.actuators.clone_from(actuators);
        }
        base
    }

    /// Resolve to a full record, filling unsupplied fields with defaults.
    #[must_use]
    pub fn with_defaults(&self) -> ProjectMetadata {
        self.apply_to(ProjectMetadata::default())
    }
}

// =============================================================================
// STEP LOG
// =============================================================================

/// Ordered, append-only log of progress lines. Appending a line that is
/// already present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepLog(Vec<String>);

impl StepLog {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append `step` unless an identical line is already logged. Returns
    /// whether the line was added.
    pub fn append(&mut self, step: impl Into<String>) -> bool {
        let step = step.into();
        if self.0.contains(&step) {
            return false;
        }
        self.0.push(step);
        true
    }

    pub fn extend<I, S>(&mut self, steps: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for step in steps {
            self.append(step);
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StepLog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut log = Self::new();
        log.extend(iter);
        log
    }
}

// =============================================================================
// PROJECT STATE
// =============================================================================

/// Cumulative client-side project: what every turn merges into.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectState {
    pub code: String,
    pub circuit: CircuitGraph,
    /// `None` until the first response that carries metadata.
    pub metadata: Option<ProjectMetadata>,
    pub steps: StepLog,
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
