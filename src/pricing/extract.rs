//! Best-effort extraction of a price breakdown from free-form model output.
//!
//! Models are asked for JSON but routinely wrap it in prose or code fences.
//! Extraction either yields a complete breakdown or an error; fields are never
//! merged with the deterministic formula.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::battery::PriceBreakdown;

/// Why model output could not be turned into a breakdown
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in model output")]
    MissingJson,
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("field `{0}` is not numeric")]
    NonNumericField(&'static str),
}

const NUMERIC_FIELDS: [&str; 4] = ["totalPrice", "materialsValue", "reuseValue", "processingFee"];

fn json_object_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Greedy: first `{` through last `}`
    PATTERN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static pattern"))
}

fn leading_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("static pattern")
    })
}

/// Locate the JSON-object-shaped span in `text`
pub fn find_json_object(text: &str) -> Option<&str> {
    json_object_pattern().find(text).map(|m| m.as_str())
}

/// Interpret a JSON value as a number.
///
/// Accepts finite JSON numbers and strings whose leading token is numeric
/// once currency symbols, thousands separators and whitespace are removed
/// (`"₹5,000"`, `"1200 INR"`, `"-150"`).
pub fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(raw) => {
            let cleaned: String = raw
                .chars()
                .filter(|c| !matches!(c, ',' | '₹' | '$' | '€' | '£') && !c.is_whitespace())
                .collect();
            let token = leading_number_pattern().find(&cleaned)?;
            token.as_str().parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

/// Parse a breakdown out of model output.
///
/// Missing or `null` numeric fields count as 0; a present field that is not
/// numeric rejects the whole response. A blank or missing description is
/// replaced by `default_description`.
pub fn extract_breakdown(
    text: &str,
    default_description: &str,
) -> Result<PriceBreakdown, ExtractionError> {
    let span = find_json_object(text).ok_or(ExtractionError::MissingJson)?;

    let parsed: Value =
        serde_json::from_str(span).map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;
    let object = parsed
        .as_object()
        .ok_or_else(|| ExtractionError::InvalidJson("top-level value is not an object".to_string()))?;

    let mut numbers = [0.0_f64; 4];
    for (slot, field) in numbers.iter_mut().zip(NUMERIC_FIELDS) {
        *slot = match object.get(field) {
            None | Some(Value::Null) => 0.0,
            Some(value) => lenient_number(value).ok_or(ExtractionError::NonNumericField(field))?,
        };
    }

    let description = object
        .get("description")
        .and_then(Value::as_str)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(default_description)
        .to_string();

    let [total_price, materials_value, reuse_value, processing_fee] = numbers;

    Ok(PriceBreakdown {
        total_price,
        materials_value,
        reuse_value,
        processing_fee,
        description,
    }
    .with_sign_policy())
}
