use super::*;
use serde_json::json;

fn project(value: serde_json::Value) -> ProjectResponse {
    match normalize(&value) {
        NormalizedResponse::Project(p) => p,
        NormalizedResponse::Failed(f) => panic!("expected project, got failure: {}", f.error),
    }
}

fn failure(value: serde_json::Value) -> ResponseFailure {
    match normalize(&value) {
        NormalizedResponse::Failed(f) => f,
        NormalizedResponse::Project(p) => panic!("expected failure, got {p:?}"),
    }
}

// =============================================================================
// model-reported errors
// =============================================================================

#[test]
fn explicit_error_short_circuits() {
    let f = failure(json!({ "error": "rate limited", "code": "void setup() {}" }));
    assert_eq!(f.kind, FailureKind::ModelReported);
    assert_eq!(f.error, "rate limited");
    assert_eq!(f.steps, vec!["Error: rate limited".to_string()]);
}

#[test]
fn explicit_error_serializes_as_error_and_steps_only() {
    let out = serde_json::to_value(normalize(&json!({ "error": "rate limited" }))).unwrap();
    assert_eq!(out, json!({ "error": "rate limited", "steps": ["Error: rate limited"] }));
}

#[test]
fn empty_error_string_is_not_an_error() {
    let p = project(json!({ "error": "", "code": "x" }));
    assert_eq!(p.code.as_deref(), Some("x"));
}

#[test]
fn non_string_error_is_rendered() {
    let f = failure(json!({ "error": { "reason": "quota" } }));
    assert_eq!(f.error, r#"{"reason":"quota"}"#);
}

// =============================================================================
// field extraction
// =============================================================================

#[test]
fn full_envelope_passes_through() {
    let p = project(json!({
        "metadata": {
            "functionality": "Blink",
            "microcontroller": "ESP32",
            "sensors": ["LDR"],
            "actuators": ["LED"]
        },
        "steps": ["Step 1", "Step 2"],
        "code": "void setup() {}",
        "circuit": {
            "components": [{ "id": "led1", "type": "led", "x": 10, "y": 20, "label": "LED" }],
            "connections": [{ "from": "mcu", "to": "led1", "fromPin": "GPIO2", "toPin": "anode" }]
        }
    }));
    assert_eq!(p.code.as_deref(), Some("void setup() {}"));
    let circuit = p.circuit.unwrap();
    assert_eq!(circuit.components[0].kind, "led");
    assert!((circuit.components[0].x - 10.0).abs() < f64::EPSILON);
    assert_eq!(circuit.connections[0].from_pin, "GPIO2");
    let meta = p.metadata.unwrap();
    assert_eq!(meta.microcontroller.as_deref(), Some("ESP32"));
    assert_eq!(meta.sensors, Some(vec!["LDR".to_string()]));
    assert_eq!(p.steps, vec!["Step 1".to_string(), "Step 2".to_string()]);
}

#[test]
fn absent_fields_stay_absent() {
    let p = project(json!({ "steps": ["only steps"] }));
    assert!(p.code.is_none());
    assert!(p.circuit.is_none());
    assert!(p.metadata.is_none());
}

#[test]
fn empty_code_is_absent() {
    assert!(project(json!({ "code": "" })).code.is_none());
}

#[test]
fn circuit_lists_default_to_empty() {
    let circuit = project(json!({ "circuit": {} })).circuit.unwrap();
    assert!(circuit.components.is_empty());
    assert!(circuit.connections.is_empty());
}

#[test]
fn metadata_records_only_supplied_fields() {
    let meta = project(json!({ "metadata": { "actuators": ["Buzzer"] } }))
        .metadata
        .unwrap();
    assert!(meta.functionality.is_none());
    assert!(meta.microcontroller.is_none());
    assert!(meta.sensors.is_none());
    assert_eq!(meta.actuators, Some(vec!["Buzzer".to_string()]));
}

#[test]
fn metadata_defaults_apply_per_field() {
    let meta = project(json!({ "metadata": { "sensors": ["DHT22"] } }))
        .metadata
        .unwrap()
        .with_defaults();
    assert_eq!(meta.functionality, "");
    assert_eq!(meta.microcontroller, "Arduino Uno");
    assert_eq!(meta.sensors, vec!["DHT22".to_string()]);
    assert!(meta.actuators.is_empty());
}

// =============================================================================
// steps coercion
// =============================================================================

#[test]
fn missing_steps_use_default_pair() {
    let p = project(json!({ "code": "x" }));
    assert_eq!(p.steps, vec!["Analyzed your request".to_string(), "Generated code and circuit based on requirements".to_string()]);
}

#[test]
fn delimited_steps_string_is_split() {
    let p = project(json!({ "steps": "Read sensor, Drive relay\n\n  Log to serial ,," }));
    assert_eq!(p.steps, vec!["Read sensor".to_string(), "Drive relay".to_string(), "Log to serial".to_string()]);
}

#[test]
fn empty_steps_array_passes_through() {
    assert!(project(json!({ "steps": [] })).steps.is_empty());
}

#[test]
fn non_string_steps_are_stringified() {
    let p = project(json!({ "steps": ["a", 2, null] }));
    assert_eq!(p.steps, vec!["a".to_string(), "2".to_string()]);
}

#[test]
fn steps_of_wrong_type_fall_back_to_default() {
    let p = project(json!({ "steps": 7 }));
    assert_eq!(p.steps.len(), 2);
}

// =============================================================================
// malformed structure
// =============================================================================

#[test]
fn non_object_input_becomes_failure() {
    let f = failure(json!(["not", "an", "object"]));
    assert_eq!(f.kind, FailureKind::Normalization);
    assert_eq!(f.steps.len(), 1);
    assert_eq!(f.steps[0], f.error);
}

#[test]
fn misshaped_circuit_is_dropped_and_rest_survives() {
    let p = project(json!({
        "code": "void setup() {}",
        "metadata": { "functionality": "Blink" },
        "steps": ["Wired LED"],
        "circuit": { "components": "led" }
    }));
    assert!(p.circuit.is_none());
    assert_eq!(p.code.as_deref(), Some("void setup() {}"));
    assert_eq!(p.metadata.unwrap().functionality.as_deref(), Some("Blink"));
    assert_eq!(p.steps, vec!["Wired LED".to_string()]);
}

#[test]
fn misshaped_code_is_dropped_and_rest_survives() {
    let p = project(json!({ "code": 42, "circuit": { "components": [] }, "steps": ["a"] }));
    assert!(p.code.is_none());
    assert!(p.circuit.is_some());
    assert_eq!(p.steps, vec!["a".to_string()]);
}

#[test]
fn misshaped_metadata_list_drops_only_that_field() {
    let meta = project(json!({ "code": "x", "metadata": { "sensors": "DHT22", "microcontroller": "ESP32" } }))
        .metadata
        .unwrap();
    assert!(meta.sensors.is_none());
    assert_eq!(meta.microcontroller.as_deref(), Some("ESP32"));
}

#[test]
fn misshaped_metadata_object_is_dropped() {
    let p = project(json!({ "code": "x", "metadata": "ESP32 board" }));
    assert!(p.metadata.is_none());
    assert_eq!(p.code.as_deref(), Some("x"));
}

#[test]
fn numeric_pins_and_string_coordinates_are_coerced() {
    let p = project(json!({
        "code": "void setup(){}",
        "metadata": { "microcontroller": "Arduino Uno" },
        "circuit": {
            "components": [{ "id": "led1", "type": "led", "x": "100", "y": 2.5, "label": null }],
            "connections": [{ "from": "mcu", "to": "led1", "fromPin": 13, "toPin": "anode" }]
        }
    }));
    assert_eq!(p.code.as_deref(), Some("void setup(){}"));
    let circuit = p.circuit.unwrap();
    let led = &circuit.components[0];
    assert!((led.x - 100.0).abs() < f64::EPSILON);
    assert!((led.y - 2.5).abs() < f64::EPSILON);
    assert_eq!(led.label, "");
    assert_eq!(circuit.connections[0].from_pin, "13");
}

#[test]
fn non_numeric_coordinate_defaults_to_zero() {
    let circuit = project(json!({ "circuit": { "components": [{ "id": "a", "x": "left", "y": {} }] } }))
        .circuit
        .unwrap();
    assert!(circuit.components[0].x.abs() < f64::EPSILON);
    assert!(circuit.components[0].y.abs() < f64::EPSILON);
}

#[test]
fn non_object_circuit_entries_are_skipped() {
    let circuit = project(json!({ "circuit": { "components": ["led", { "id": "r1", "type": "resistor" }] } }))
        .circuit
        .unwrap();
    assert_eq!(circuit.components.len(), 1);
    assert_eq!(circuit.components[0].id, "r1");
}

#[test]
fn metadata_list_entries_are_stringified() {
    let meta = project(json!({ "metadata": { "actuators": ["Servo", 2, null] } })).metadata.unwrap();
    assert_eq!(meta.actuators, Some(vec!["Servo".to_string(), "2".to_string()]));
}

#[test]
fn every_outcome_has_steps() {
    for value in [json!(null), json!({}), json!({ "error": "x" }), json!({ "circuit": 1 })] {
        assert!(!normalize(&value).steps().is_empty(), "no steps for {value}");
    }
}
