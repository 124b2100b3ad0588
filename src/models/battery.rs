use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

/// Battery category as submitted by a seller.
///
/// Out-of-set values are kept as `Unrecognized` so a relaxed caller can still
/// price them with the default rate. The HTTP boundary rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BatteryCategory {
    EvStandard,
    EvPremium,
    Hybrid,
    EnergyStorage,
    Other,
    Unrecognized(String),
}

impl BatteryCategory {
    pub const KNOWN: [&'static str; 5] = ["ev_standard", "ev_premium", "hybrid", "energy_storage", "other"];

    pub fn as_str(&self) -> &str {
        match self {
            Self::EvStandard => "ev_standard",
            Self::EvPremium => "ev_premium",
            Self::Hybrid => "hybrid",
            Self::EnergyStorage => "energy_storage",
            Self::Other => "other",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for BatteryCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ev_standard" => Self::EvStandard,
            "ev_premium" => Self::EvPremium,
            "hybrid" => Self::Hybrid,
            "energy_storage" => Self::EnergyStorage,
            "other" => Self::Other,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for BatteryCategory {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<BatteryCategory> for String {
    fn from(value: BatteryCategory) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BatteryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative battery condition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionGrade {
    Excellent,
    Good,
    Fair,
    Poor,
    Damaged,
    Unrecognized(String),
}

impl ConditionGrade {
    pub const KNOWN: [&'static str; 5] = ["excellent", "good", "fair", "poor", "damaged"];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Damaged => "damaged",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for ConditionGrade {
    fn from(value: String) -> Self {
        match value.as_str() {
            "excellent" => Self::Excellent,
            "good" => Self::Good,
            "fair" => Self::Fair,
            "poor" => Self::Poor,
            "damaged" => Self::Damaged,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for ConditionGrade {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ConditionGrade> for String {
    fn from(value: ConditionGrade) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ConditionGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated battery description consumed by the price estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryAttributes {
    pub category: BatteryCategory,
    pub model_label: String,
    pub age_years: f64,
    #[serde(rename = "capacityKWh")]
    pub capacity_kwh: f64,
    pub condition_grade: ConditionGrade,
}

/// Price breakdown returned to the client.
///
/// The three components are independent percentages of `total_price` and do
/// not sum to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub total_price: f64,
    pub materials_value: f64,
    pub reuse_value: f64,
    pub processing_fee: f64,
    pub description: String,
}

impl PriceBreakdown {
    /// Clamp components to the published sign policy
    pub fn with_sign_policy(mut self) -> Self {
        self.total_price = self.total_price.max(0.0);
        self.materials_value = self.materials_value.max(0.0);
        self.reuse_value = self.reuse_value.max(0.0);
        self.processing_fee = negative_or_zero(self.processing_fee);
        self
    }
}

/// `-|value|`, without producing a negative zero
pub fn negative_or_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        -value.abs()
    }
}

/// Raw pricing form as posted by the client.
///
/// Field names follow the web form (`type`, `model`, `age`, ...) with aliases
/// for the camelCase attribute names and the stored battery record names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatteryPricingRequest {
    #[serde(rename = "type", alias = "category", alias = "batteryType")]
    pub category: Option<String>,
    #[serde(alias = "modelLabel", alias = "modelNumber")]
    pub model: Option<String>,
    #[serde(alias = "ageYears", alias = "batteryAge")]
    pub age: Option<serde_json::Value>,
    #[serde(alias = "capacityKWh")]
    pub capacity: Option<serde_json::Value>,
    #[serde(alias = "conditionGrade")]
    pub condition: Option<String>,
}

impl BatteryPricingRequest {
    /// Validate every field, reporting all problems at once
    pub fn validate(self) -> Result<BatteryAttributes, AppError> {
        let mut issues = Vec::new();

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => {
                issues.push("type: Please select a battery type".to_string());
                None
            }
            Some(raw) => {
                let category = BatteryCategory::from(raw);
                if !category.is_recognized() {
                    issues.push(format!(
                        "type: expected one of {}, received '{}'",
                        BatteryCategory::KNOWN.join(", "),
                        raw
                    ));
                }
                Some(category)
            }
        };

        let model_label = self.model.as_deref().map(str::trim).unwrap_or_default().to_string();
        if model_label.is_empty() {
            issues.push("model: Model is required".to_string());
        }

        let age_years = non_negative("age", "Age", self.age.as_ref(), &mut issues);
        let capacity_kwh = non_negative("capacity", "Capacity", self.capacity.as_ref(), &mut issues);

        let condition_grade = match self.condition.as_deref().map(str::trim) {
            None | Some("") => {
                issues.push("condition: Please select a battery condition".to_string());
                None
            }
            Some(raw) => {
                let grade = ConditionGrade::from(raw);
                if !grade.is_recognized() {
                    issues.push(format!(
                        "condition: expected one of {}, received '{}'",
                        ConditionGrade::KNOWN.join(", "),
                        raw
                    ));
                }
                Some(grade)
            }
        };

        match (category, condition_grade) {
            (Some(category), Some(condition_grade)) if issues.is_empty() => Ok(BatteryAttributes {
                category,
                model_label,
                age_years,
                capacity_kwh,
                condition_grade,
            }),
            _ => Err(AppError::Validation(issues.join("; "))),
        }
    }
}

/// A JSON number, or a string that is entirely a finite number
fn form_number(value: &serde_json::Value) -> Option<f64> {
    let number = match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn non_negative(
    field: &str,
    label: &str,
    value: Option<&serde_json::Value>,
    issues: &mut Vec<String>,
) -> f64 {
    match value.and_then(form_number) {
        Some(number) if number >= 0.0 => number,
        Some(_) => {
            issues.push(format!("{}: {} must be a positive number", field, label));
            0.0
        }
        None => {
            issues.push(format!("{}: {} is required and must be a number", field, label));
            0.0
        }
    }
}
