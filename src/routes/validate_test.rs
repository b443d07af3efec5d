use super::*;

#[tokio::test]
async fn board_catalog_lists_every_board() {
    let Json(catalog) = list_boards().await;
    assert_eq!(catalog.boards.len(), 6);
    assert!(catalog.boards.iter().any(|b| b.id == "esp32" && b.battery_powered));
    assert_eq!(catalog.languages, vec!["c", "cpp", "python", "javascript", "rust"]);

    let value = serde_json::to_value(&catalog).unwrap();
    assert_eq!(value["frameworks"][1], "esp-idf");
    assert_eq!(value["boards"][0]["name"], "Arduino Uno");
}

#[tokio::test]
async fn validate_code_runs_heuristics() {
    let body = ValidateBody {
        code: "void loop() { blink(); }".into(),
        microcontroller: "esp32".into(),
        ram_usage: "1KB / 520KB".into(),
        flash_usage: "1KB / 4MB".into(),
        language: "cpp".into(),
    };
    let Json(report) = validate_code(Json(body)).await;
    assert!(report.memory_valid);
    assert!(!report.power_efficient);
    assert!(report.compilation_valid);
}

#[tokio::test]
async fn validate_code_unknown_board() {
    let body = ValidateBody {
        code: String::new(),
        microcontroller: "Arduino Uno".into(),
        ram_usage: "1KB".into(),
        flash_usage: "1KB".into(),
        language: "cpp".into(),
    };
    let Json(report) = validate_code(Json(body)).await;
    assert_eq!(report.warnings, vec!["Unknown microcontroller. Cannot validate hardware constraints.".to_string()]);
}

#[test]
fn validate_body_defaults_language() {
    let body: ValidateBody = serde_json::from_value(serde_json::json!({
        "code": "",
        "microcontroller": "esp32",
        "ram_usage": "1KB",
        "flash_usage": "1KB"
    }))
    .unwrap();
    assert_eq!(body.language, "cpp");
}
