use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::error::AppError;
use crate::models::marketplace::{AnalyticsEntry, ChartData, MarketData};

#[derive(Debug, Default, Deserialize)]
pub struct MarketDataQuery {
    #[serde(rename = "type")]
    pub data_type: Option<String>,
}

/// Handle GET /api/analytics
pub async fn list_analytics(State(state): State<AppState>) -> Json<Vec<AnalyticsEntry>> {
    Json(state.storage.list_analytics())
}

/// Handle GET /api/market-data
pub async fn market_data(
    State(state): State<AppState>,
    Query(query): Query<MarketDataQuery>,
) -> Json<Vec<MarketData>> {
    let data = match query.data_type.as_deref().filter(|t| !t.is_empty()) {
        Some(data_type) => state.storage.market_data_by_type(data_type),
        None => state.storage.list_market_data(),
    };
    Json(data)
}

/// Handle GET /api/chart-data/{type}
pub async fn chart_data(
    State(state): State<AppState>,
    Path(chart_type): Path<String>,
) -> Result<Json<ChartData>, AppError> {
    state
        .storage
        .get_chart_data(&chart_type)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Chart '{}' not found", chart_type)))
}
