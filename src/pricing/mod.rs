pub mod estimator;
pub mod extract;
pub mod formula;
pub mod prompt;

pub use estimator::{Estimate, EstimateSource, FallbackReason, PriceEstimator};
pub use formula::PricingFormula;
