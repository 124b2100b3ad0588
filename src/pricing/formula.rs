use crate::config::{BaseRates, PricingConfig};
use crate::models::battery::{negative_or_zero, BatteryAttributes, ConditionGrade, PriceBreakdown};

/// Minimum residual value fraction after age depreciation
pub const AGE_FLOOR: f64 = 0.2;
/// Linear depreciation per year of age
pub const AGE_DECAY_PER_YEAR: f64 = 0.1;

pub const MATERIALS_SHARE: f64 = 0.7;
pub const REUSE_SHARE: f64 = 0.5;
pub const PROCESSING_SHARE: f64 = 0.2;

/// Deterministic fallback pricing.
///
/// `total = round(rate × capacity × ageFactor × conditionFactor / unit) × unit`,
/// with each component an independent percentage of the rounded total.
#[derive(Debug, Clone)]
pub struct PricingFormula {
    rates: BaseRates,
    rounding_unit: f64,
    description: String,
}

impl PricingFormula {
    pub fn new(config: &PricingConfig) -> Self {
        Self {
            rates: config.base_rates.clone(),
            rounding_unit: config.rounding_unit,
            description: config.description.clone(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn age_factor(age_years: f64) -> f64 {
        (1.0 - AGE_DECAY_PER_YEAR * sanitize(age_years)).max(AGE_FLOOR)
    }

    pub fn condition_factor(condition: &ConditionGrade) -> f64 {
        match condition {
            ConditionGrade::Excellent => 1.0,
            ConditionGrade::Good => 0.8,
            ConditionGrade::Fair => 0.6,
            ConditionGrade::Poor => 0.4,
            ConditionGrade::Damaged => 0.2,
            ConditionGrade::Unrecognized(_) => 0.5,
        }
    }

    /// Unrounded value before the currency rounding step
    pub fn raw_value(&self, attrs: &BatteryAttributes) -> f64 {
        let base = self.rates.rate_for(&attrs.category) * sanitize(attrs.capacity_kwh);
        base * Self::age_factor(attrs.age_years) * Self::condition_factor(&attrs.condition_grade)
    }

    pub fn compute(&self, attrs: &BatteryAttributes) -> PriceBreakdown {
        let unit = if self.rounding_unit > 0.0 { self.rounding_unit } else { 1.0 };
        // Huge finite inputs can overflow the product
        let total_price = sanitize((sanitize(self.raw_value(attrs)) / unit).round() * unit);

        PriceBreakdown {
            total_price,
            materials_value: (total_price * MATERIALS_SHARE).round(),
            reuse_value: (total_price * REUSE_SHARE).round(),
            processing_fee: negative_or_zero((total_price * PROCESSING_SHARE).round()),
            description: self.description.clone(),
        }
    }
}

/// Non-finite and negative inputs count as 0
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
