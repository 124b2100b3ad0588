/// HTTP API tests driving the full router
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use battery_market::{
    config::{AiProviderKind, Config},
    server::{build_state, create_router},
};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

fn router(config: &Config) -> Router {
    create_router(config, build_state(config).unwrap(), None)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn form() -> Value {
    json!({
        "type": "ev_premium",
        "model": "Model S 85",
        "age": "4",
        "capacity": 85,
        "condition": "good"
    })
}

#[tokio::test]
async fn test_price_form_offline() {
    let response = router(&Config::default())
        .oneshot(post_json("/api/battery/price", form()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-estimate-source"], "formula:disabled");

    // 150 × 85 × 0.6 × 0.8 = 6120
    let body = body_json(response).await;
    assert_eq!(body["totalPrice"], 6120.0);
    assert_eq!(body["materialsValue"], 4284.0);
    assert_eq!(body["reuseValue"], 3060.0);
    assert_eq!(body["processingFee"], -1224.0);
}

#[tokio::test]
async fn test_price_form_with_gemini() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/models/gemini-1.5-pro:generateContent");
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "{\"totalPrice\": 7000, \"materialsValue\": 4900, \"reuseValue\": 3500, \"processingFee\": -1400, \"description\": \"Premium pack\"}"}]}
                }]
            }));
        })
        .await;

    let mut config = Config::default();
    config.ai.provider = AiProviderKind::Gemini;
    config.ai.api_key = "test-key".to_string();
    config.ai.base_url = Some(server.base_url());

    let response = router(&config)
        .oneshot(post_json("/api/battery/price", form()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-estimate-source"], "model:gemini");
    let body = body_json(response).await;
    assert_eq!(body["totalPrice"], 7000.0);
    assert_eq!(body["description"], "Premium pack");
}

#[tokio::test]
async fn test_rupee_profile_end_to_end() {
    let mut config = Config::default();
    config.pricing.currency = "INR".to_string();
    config.pricing.rounding_unit = 100.0;
    config.pricing.base_rates.ev_standard = 5000.0;
    config.pricing.base_rates.ev_premium = 8000.0;
    config.pricing.base_rates.hybrid = 4000.0;
    config.pricing.base_rates.energy_storage = 6000.0;
    config.pricing.base_rates.other = 3000.0;
    config.pricing.base_rates.unknown = 2500.0;

    let response = router(&config)
        .oneshot(Request::builder().uri("/api/test-estimate").body(Body::empty()).unwrap())
        .await
        .unwrap();

    // 5000 × 30 × 0.8 × 0.8
    let body = body_json(response).await;
    assert_eq!(body["estimate"]["totalPrice"], 96000.0);
}

#[tokio::test]
async fn test_validation_error_shape() {
    let response = router(&Config::default())
        .oneshot(post_json("/api/battery/price", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "validation_error");
    let message = body["error"]["message"].as_str().unwrap();
    for field in ["type:", "model:", "age:", "capacity:", "condition:"] {
        assert!(message.contains(field), "missing {} in {}", field, message);
    }
}

#[tokio::test]
async fn test_marketplace_routes() {
    let app = router(&Config::default());

    for uri in [
        "/api/products",
        "/api/subsidies",
        "/api/ideas",
        "/api/analytics",
        "/api/market-data",
        "/api/chart-data/market_gap",
        "/api/business-inquiries",
        "/api/contributions",
        "/health",
        "/ready",
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
    }
}
