use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{json_body, parse_id, AppState};
use crate::error::AppError;
use crate::metrics;
use crate::models::battery::{BatteryAttributes, BatteryCategory, BatteryPricingRequest, ConditionGrade};
use crate::models::marketplace::{NewBattery, NewPickupRequest};
use crate::pricing::EstimateSource;

pub const ESTIMATE_SOURCE_HEADER: &str = "x-estimate-source";

/// Seller submission: the pricing form plus an optional manufacturer
#[derive(Debug, Deserialize)]
pub struct SaveBatteryRequest {
    #[serde(flatten)]
    pub pricing: BatteryPricingRequest,
    #[serde(default)]
    pub manufacturer: Option<String>,
}

fn source_header(source: &EstimateSource) -> [(HeaderName, HeaderValue); 1] {
    let value = HeaderValue::from_str(&source.header_value())
        .unwrap_or_else(|_| HeaderValue::from_static("formula"));
    [(HeaderName::from_static(ESTIMATE_SOURCE_HEADER), value)]
}

/// Handle POST /api/battery/price
pub async fn estimate_price(
    State(state): State<AppState>,
    payload: Result<Json<BatteryPricingRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let attrs = json_body(payload)?.validate()?;
    let estimate = state.estimator.estimate(&attrs).await;

    Ok((source_header(&estimate.source), Json(estimate.breakdown)).into_response())
}

/// Handle POST /api/battery
///
/// Estimates the battery and stores it with `estimatedPrice = totalPrice`.
pub async fn save_battery(
    State(state): State<AppState>,
    payload: Result<Json<SaveBatteryRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = json_body(payload)?;
    let manufacturer = request.manufacturer.unwrap_or_default();
    let attrs = request.pricing.validate()?;
    let estimate = state.estimator.estimate(&attrs).await;

    let battery = state.storage.create_battery(NewBattery {
        battery_type: attrs.category,
        manufacturer,
        model_number: attrs.model_label,
        battery_age: attrs.age_years,
        capacity: attrs.capacity_kwh,
        condition: attrs.condition_grade,
        estimated_price: Some(estimate.breakdown.total_price),
    });
    metrics::record_created("battery");
    info!(battery_id = battery.id, "Battery saved");

    Ok((
        StatusCode::CREATED,
        source_header(&estimate.source),
        Json(battery),
    )
        .into_response())
}

/// Handle GET /api/battery/{id}
pub async fn get_battery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id, "battery")?;
    let battery = state
        .storage
        .get_battery(id)
        .ok_or_else(|| AppError::NotFound(format!("Battery {} not found", id)))?;

    Ok(Json(battery).into_response())
}

/// Handle GET /api/battery/{id}/pickups
pub async fn list_pickups(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id, "battery")?;
    if state.storage.get_battery(id).is_none() {
        return Err(AppError::NotFound(format!("Battery {} not found", id)));
    }

    Ok(Json(state.storage.pickups_for_battery(id)).into_response())
}

/// Handle POST /api/pickups
pub async fn create_pickup(
    State(state): State<AppState>,
    payload: Result<Json<NewPickupRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = json_body(payload)?;
    if request.address.trim().is_empty() {
        return Err(AppError::Validation("address: Address is required".to_string()));
    }

    let pickup = state.storage.create_pickup(request)?;
    metrics::record_created("pickup_request");

    Ok((StatusCode::CREATED, Json(pickup)).into_response())
}

/// Handle GET /api/test-estimate
///
/// Prices a fixed sample battery through the configured estimator.
pub async fn test_estimate(State(state): State<AppState>) -> Response {
    let sample = BatteryAttributes {
        category: BatteryCategory::EvStandard,
        model_label: "Tata Nexon EV".to_string(),
        age_years: 2.0,
        capacity_kwh: 30.0,
        condition_grade: ConditionGrade::Good,
    };

    let estimate = state.estimator.estimate(&sample).await;

    (
        source_header(&estimate.source),
        Json(json!({
            "success": true,
            "source": estimate.source.header_value(),
            "estimate": estimate.breakdown,
        })),
    )
        .into_response()
}
