use anyhow::Result;
use battery_market::{
    config,
    models::battery::BatteryPricingRequest,
    pricing::PriceEstimator,
    providers,
};
use serde_json::json;
use std::path::Path;
use tracing::info;

use crate::cli::EstimateArgs;

/// Execute the estimate command
///
/// Validates the arguments like the HTTP form does and prints the breakdown
/// with its source as pretty JSON.
pub async fn execute(config_path: &Path, args: EstimateArgs) -> Result<()> {
    let cfg = config::load_or_default(config_path)?;

    let attrs = BatteryPricingRequest {
        category: Some(args.battery_type),
        model: Some(args.model),
        age: Some(json!(args.age)),
        capacity: Some(json!(args.capacity)),
        condition: Some(args.condition),
    }
    .validate()?;

    let estimator = if args.offline {
        PriceEstimator::offline(cfg.pricing.clone())
    } else {
        PriceEstimator::new(cfg.pricing.clone(), providers::build_generator(&cfg.ai)?)
    };

    info!(offline = args.offline, "Estimating battery price");
    let estimate = estimator.estimate(&attrs).await;

    let output = json!({
        "source": estimate.source.header_value(),
        "currency": cfg.pricing.currency,
        "estimate": estimate.breakdown,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
