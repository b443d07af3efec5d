//! Local validation routes. No LLM involved.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::project::validate::{self, BOARDS, BoardSpec, Framework, Language, ValidationReport};

#[derive(Debug, Serialize)]
pub struct BoardCatalog {
    pub boards: &'static [BoardSpec],
    pub languages: Vec<&'static str>,
    pub frameworks: Vec<Framework>,
}

pub async fn list_boards() -> Json<BoardCatalog> {
    Json(BoardCatalog {
        boards: &BOARDS,
        languages: Language::ALL.iter().map(|l| l.tag()).collect(),
        frameworks: Framework::ALL.to_vec(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ValidateBody {
    pub code: String,
    pub microcontroller: String,
    pub ram_usage: String,
    pub flash_usage: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    crate::services::generation::DEFAULT_LANGUAGE.to_string()
}

pub async fn validate_code(Json(body): Json<ValidateBody>) -> Json<ValidationReport> {
    Json(validate::validate_code(
        &body.code,
        &body.microcontroller,
        &body.ram_usage,
        &body.flash_usage,
        &body.language,
    ))
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
