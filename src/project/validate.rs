//! Heuristic code validator: advisory checks without compiling anything.
//!
//! Three independent verdicts over the generated source:
//! - memory: reported RAM/Flash usage against the board's rated capacity
//! - power: battery boards must mention some power-saving call
//! - compilation: balanced braces for C-family code, no TODO/FIXME markers
//!
//! Every check is lexical. Unknown boards produce a report, never an error.

use serde::Serialize;

/// Usage at or above this share of capacity raises an "approaching limit" warning.
const NEAR_LIMIT_RATIO: f64 = 0.9;

const POWER_SAVING_MARKERS: [&str; 3] = ["sleep", "power", "low_power"];
const INCOMPLETE_MARKERS: [&str; 2] = ["TODO", "FIXME"];

// =============================================================================
// BOARD TABLE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub ram: &'static str,
    pub flash: &'static str,
    pub battery_powered: bool,
}

pub static BOARDS: [BoardSpec; 6] = [
    BoardSpec { id: "arduino-uno", name: "Arduino Uno", ram: "2KB", flash: "32KB", battery_powered: false },
    BoardSpec { id: "arduino-mega", name: "Arduino Mega", ram: "8KB", flash: "256KB", battery_powered: false },
    BoardSpec { id: "esp32", name: "ESP32", ram: "520KB", flash: "4MB", battery_powered: true },
    BoardSpec { id: "esp8266", name: "ESP8266", ram: "80KB", flash: "4MB", battery_powered: true },
    BoardSpec { id: "stm32f4", name: "STM32F4", ram: "192KB", flash: "1MB", battery_powered: true },
    BoardSpec { id: "raspberry-pi-pico", name: "Raspberry Pi Pico", ram: "264KB", flash: "2MB", battery_powered: true },
];

/// Look a board up by its exact id.
#[must_use]
pub fn board(id: &str) -> Option<&'static BoardSpec> {
    BOARDS.iter().find(|b| b.id == id)
}

/// Look a board up by id, display name, or a loose spelling of either
/// ("Arduino Uno", "arduino_uno", "ESP-32" all resolve).
#[must_use]
pub fn resolve_board(name_or_id: &str) -> Option<&'static BoardSpec> {
    let wanted = slug(name_or_id);
    BOARDS
        .iter()
        .find(|b| b.id == name_or_id || slug(b.id) == wanted || slug(b.name) == wanted)
}

fn slug(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// =============================================================================
// LANGUAGES AND FRAMEWORKS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Python,
    JavaScript,
    Rust,
}

impl Language {
    pub const ALL: [Self; 5] = [Self::C, Self::Cpp, Self::Python, Self::JavaScript, Self::Rust];

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "c" => Some(Self::C),
            "cpp" | "c++" => Some(Self::Cpp),
            "python" => Some(Self::Python),
            "javascript" | "js" => Some(Self::JavaScript),
            "rust" => Some(Self::Rust),
            _ => None,
        }
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::Rust => "rust",
        }
    }

    #[must_use]
    pub fn is_c_family(self) -> bool {
        matches!(self, Self::C | Self::Cpp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    Arduino,
    EspIdf,
    Stm32Hal,
    FreeRtos,
}

impl Framework {
    pub const ALL: [Self; 4] = [Self::Arduino, Self::EspIdf, Self::Stm32Hal, Self::FreeRtos];
}

// =============================================================================
// MEMORY STRINGS
// =============================================================================

/// Parse a size like `"1.9KB"`, `"4 MB"`, or `"512"` into bytes. Only the
/// leading number is read; the unit is found anywhere after it.
#[must_use]
pub fn parse_memory_size(size: &str) -> Option<f64> {
    let trimmed = size.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && matches!(c, '-' | '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    let value: f64 = trimmed[..end].parse().ok()?;

    let unit = trimmed[end..].to_ascii_lowercase();
    if unit.contains("kb") {
        Some(value * 1024.0)
    } else if unit.contains("mb") {
        Some(value * 1024.0 * 1024.0)
    } else {
        Some(value)
    }
}

/// The "used" half of a `"used / total"` usage string.
fn used_part(usage: &str) -> &str {
    usage.split('/').next().unwrap_or(usage).trim()
}

// =============================================================================
// RESOURCE ESTIMATES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceEstimates {
    pub ram: String,
    pub flash: String,
}

/// Rough footprint from source length: one KB of RAM per 30 characters and
/// one KB of Flash per 10, rendered as `"<used>KB / <capacity>"`.
#[must_use]
pub fn estimate_resources(code: &str, microcontroller: &str) -> ResourceEstimates {
    let len = code.chars().count();
    let spec = board(microcontroller);
    ResourceEstimates {
        ram: format!("{}KB / {}", len / 30, spec.map_or("Unknown", |b| b.ram)),
        flash: format!("{}KB / {}", len / 10, spec.map_or("Unknown", |b| b.flash)),
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub memory_valid: bool,
    pub power_efficient: bool,
    pub compilation_valid: bool,
    pub warnings: Vec<String>,
}

/// Run every heuristic over `code` for the board `microcontroller`.
///
/// `ram_usage` and `flash_usage` are `"used / total"` strings; only the used
/// half is read, capacity comes from the board table.
#[must_use]
pub fn validate_code(
    code: &str,
    microcontroller: &str,
    ram_usage: &str,
    flash_usage: &str,
    language: &str,
) -> ValidationReport {
    let Some(spec) = board(microcontroller) else {
        return ValidationReport {
            warnings: vec!["Unknown microcontroller. Cannot validate hardware constraints.".to_string()],
            ..ValidationReport::default()
        };
    };

    let mut warnings = Vec::new();
    let ram_ok = check_memory("RAM", ram_usage, spec.ram, &mut warnings);
    let flash_ok = check_memory("Flash", flash_usage, spec.flash, &mut warnings);
    let power_efficient = check_power(code, spec, &mut warnings);
    let compilation_valid = check_compilation(code, Language::from_tag(language), &mut warnings);

    ValidationReport { memory_valid: ram_ok && flash_ok, power_efficient, compilation_valid, warnings }
}

fn check_memory(resource: &str, usage: &str, capacity: &str, warnings: &mut Vec<String>) -> bool {
    let used_text = used_part(usage);
    let (Some(used), Some(total)) = (parse_memory_size(used_text), parse_memory_size(capacity)) else {
        warnings.push(format!("Could not parse {resource} usage ({usage:?})"));
        return false;
    };

    if used >= total * NEAR_LIMIT_RATIO {
        warnings.push(format!("{resource} usage ({used_text}) is approaching limit ({capacity})"));
    }
    used < total
}

fn check_power(code: &str, spec: &BoardSpec, warnings: &mut Vec<String>) -> bool {
    if !spec.battery_powered {
        return true;
    }
    let lower = code.to_lowercase();
    if POWER_SAVING_MARKERS.iter().any(|m| lower.contains(m)) {
        return true;
    }
    warnings.push("No power-saving features detected in code for battery-powered device".to_string());
    false
}

fn check_compilation(code: &str, language: Option<Language>, warnings: &mut Vec<String>) -> bool {
    let mut valid = true;

    if language.is_some_and(Language::is_c_family) {
        let open = code.matches('{').count();
        let close = code.matches('}').count();
        if open != close {
            valid = false;
            warnings.push(format!("Possible syntax error: mismatched braces ({open} open, {close} close)"));
        }
    }

    if INCOMPLETE_MARKERS.iter().any(|m| code.contains(m)) {
        valid = false;
        warnings.push("Code contains TODO or FIXME comments that may indicate incomplete implementation".to_string());
    }

    valid
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
