use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::PricingConfig;
use crate::metrics;
use crate::models::battery::{BatteryAttributes, PriceBreakdown};
use crate::pricing::extract::{extract_breakdown, ExtractionError};
use crate::pricing::formula::PricingFormula;
use crate::pricing::prompt::build_prompt;
use crate::providers::TextGenerator;

/// Why the deterministic formula produced the estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No text generator configured
    Disabled,
    /// The provider call failed (transport, status, empty output)
    UpstreamError,
    MissingJson,
    InvalidJson,
    NonNumericField,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::UpstreamError => "upstream_error",
            Self::MissingJson => "missing_json",
            Self::InvalidJson => "invalid_json",
            Self::NonNumericField => "non_numeric_field",
        }
    }
}

impl From<&ExtractionError> for FallbackReason {
    fn from(err: &ExtractionError) -> Self {
        match err {
            ExtractionError::MissingJson => Self::MissingJson,
            ExtractionError::InvalidJson(_) => Self::InvalidJson,
            ExtractionError::NonNumericField(_) => Self::NonNumericField,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EstimateSource {
    Model { provider: String },
    Formula { reason: FallbackReason },
}

impl EstimateSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Model { .. } => "model",
            Self::Formula { .. } => "formula",
        }
    }

    /// Value for the `x-estimate-source` response header
    pub fn header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EstimateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model { provider } => write!(f, "model:{}", provider),
            Self::Formula { reason } => write!(f, "formula:{}", reason.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub breakdown: PriceBreakdown,
    pub source: EstimateSource,
}

/// Battery price estimator.
///
/// Tries the configured text generator once and falls back to
/// [`PricingFormula`] on any failure. `estimate` never fails.
pub struct PriceEstimator {
    pricing: PricingConfig,
    formula: PricingFormula,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl PriceEstimator {
    pub fn new(pricing: PricingConfig, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let formula = PricingFormula::new(&pricing);
        Self {
            pricing,
            formula,
            generator,
        }
    }

    /// Formula-only estimator
    pub fn offline(pricing: PricingConfig) -> Self {
        Self::new(pricing, None)
    }

    pub fn formula(&self) -> &PricingFormula {
        &self.formula
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.generator.as_ref().map(|g| g.provider_name())
    }

    pub async fn estimate(&self, attrs: &BatteryAttributes) -> Estimate {
        let start = Instant::now();

        let estimate = match &self.generator {
            Some(generator) => self.attempt_external(generator.as_ref(), attrs).await,
            None => self.fallback(attrs, FallbackReason::Disabled),
        };

        metrics::record_estimate(&estimate.source, start.elapsed());
        info!(
            category = %attrs.category,
            source = %estimate.source,
            total_price = estimate.breakdown.total_price,
            "Battery price estimated"
        );

        estimate
    }

    async fn attempt_external(
        &self,
        generator: &dyn TextGenerator,
        attrs: &BatteryAttributes,
    ) -> Estimate {
        let prompt = build_prompt(attrs, &self.pricing);

        let text = match generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(provider = generator.provider_name(), error = %e, "Text generation failed, using formula");
                return self.fallback(attrs, FallbackReason::UpstreamError);
            }
        };

        debug!(provider = generator.provider_name(), chars = text.len(), "Received model output");

        match extract_breakdown(&text, self.formula.description()) {
            Ok(breakdown) => Estimate {
                breakdown,
                source: EstimateSource::Model {
                    provider: generator.provider_name().to_string(),
                },
            },
            Err(e) => {
                warn!(provider = generator.provider_name(), error = %e, "Unusable model output, using formula");
                self.fallback(attrs, FallbackReason::from(&e))
            }
        }
    }

    fn fallback(&self, attrs: &BatteryAttributes, reason: FallbackReason) -> Estimate {
        Estimate {
            breakdown: self.formula.compute(attrs),
            source: EstimateSource::Formula { reason },
        }
    }
}
