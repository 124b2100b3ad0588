use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use crate::pricing::EstimateSource;

/// Install the Prometheus recorder as the global metrics recorder
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    init_metric_descriptions();

    Ok(handle)
}

fn init_metric_descriptions() {
    describe_counter!(
        "battery_estimates_total",
        "Total number of battery price estimates, by source"
    );
    describe_histogram!(
        "battery_estimate_duration_seconds",
        "Time spent producing an estimate in seconds"
    );
    describe_counter!(
        "marketplace_records_created_total",
        "Total number of marketplace records created"
    );
    describe_gauge!("battery_market_info", "Service version information");

    gauge!("battery_market_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record one finished estimate
pub fn record_estimate(source: &EstimateSource, duration: Duration) {
    let reason = match source {
        EstimateSource::Model { .. } => "none",
        EstimateSource::Formula { reason } => reason.as_str(),
    };

    counter!(
        "battery_estimates_total",
        "source" => source.label(),
        "reason" => reason
    )
    .increment(1);

    histogram!(
        "battery_estimate_duration_seconds",
        "source" => source.label()
    )
    .record(duration.as_secs_f64());
}

/// Record a stored marketplace record (battery, pickup, idea, ...)
pub fn record_created(entity: &'static str) {
    counter!("marketplace_records_created_total", "entity" => entity).increment(1);
}
