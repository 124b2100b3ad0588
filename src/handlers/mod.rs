pub mod analytics;
pub mod battery;
pub mod health;
pub mod ideas;
pub mod intake;
pub mod products;
pub mod subsidies;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use std::sync::Arc;

use crate::error::AppError;
use crate::pricing::PriceEstimator;
use crate::storage::Storage;

/// Application state shared by the API handlers
#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<PriceEstimator>,
    pub storage: Arc<dyn Storage>,
}

/// Unwrap a JSON body, reporting malformed payloads as validation errors
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// Parse a numeric path id
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AppError::Validation(format!("Invalid {} ID", entity)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::PricingConfig;
    use crate::storage::MemStorage;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use axum::Router;
    use serde_json::Value;

    pub fn offline_state() -> AppState {
        AppState {
            estimator: Arc::new(PriceEstimator::offline(PricingConfig::default())),
            storage: Arc::new(MemStorage::seeded()),
        }
    }

    pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub async fn read_json(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub fn app(state: AppState) -> Router {
        crate::server::api_routes().with_state(state)
    }
}
