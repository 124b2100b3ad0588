use crate::config::PricingConfig;
use crate::models::battery::BatteryAttributes;

/// Prompt sent to a text-generation provider
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPrompt {
    /// Role framing for the model
    pub system: String,
    /// Battery details and the requested answer shape
    pub user: String,
}

impl PricingPrompt {
    /// Both parts as one block, for providers without a system role
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

pub fn build_prompt(attrs: &BatteryAttributes, pricing: &PricingConfig) -> PricingPrompt {
    let market = pricing
        .market_context
        .as_deref()
        .map(|market| format!(" for the {} market", market))
        .unwrap_or_default();

    let system = format!(
        "You appraise used lithium-ion batteries for recycling and second-life resale{market}. \
         Weigh battery chemistry and type, remaining capacity, age, physical condition, \
         recoverable material value, local recycling regulation and current demand."
    );

    let user = format!(
        "Estimate the recycling value of this battery.\n\
         Type: {category}\n\
         Model: {model}\n\
         Age: {age} years\n\
         Capacity: {capacity} kWh\n\
         Condition: {condition}\n\n\
         Answer with a single JSON object and nothing else, using amounts in {currency}:\n\
         {{\"totalPrice\": number, \"materialsValue\": number, \"reuseValue\": number, \
         \"processingFee\": number, \"description\": string}}\n\
         processingFee is a cost and must be negative. description briefly explains the valuation.",
        category = attrs.category,
        model = attrs.model_label,
        age = attrs.age_years,
        capacity = attrs.capacity_kwh,
        condition = attrs.condition_grade,
        currency = pricing.currency,
    );

    PricingPrompt { system, user }
}
