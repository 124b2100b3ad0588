/// End-to-end estimator behaviour against mocked Gemini and OpenAI endpoints
use battery_market::{
    config::{AiConfig, AiProviderKind, PricingConfig},
    models::battery::{BatteryAttributes, BatteryCategory, ConditionGrade},
    pricing::{EstimateSource, FallbackReason, PriceEstimator, PricingFormula},
    providers::build_generator,
};
use httpmock::prelude::*;
use serde_json::json;

fn boundary_battery() -> BatteryAttributes {
    BatteryAttributes {
        category: BatteryCategory::EvStandard,
        model_label: "Nissan Leaf".to_string(),
        age_years: 0.0,
        capacity_kwh: 10.0,
        condition_grade: ConditionGrade::Excellent,
    }
}

fn gemini_estimator(server: &MockServer) -> PriceEstimator {
    let ai = AiConfig {
        provider: AiProviderKind::Gemini,
        model: Some("gemini-test".to_string()),
        api_key: "test-key".to_string(),
        base_url: Some(server.base_url()),
        timeout_seconds: Some(5),
        ..AiConfig::default()
    };
    PriceEstimator::new(PricingConfig::default(), build_generator(&ai).unwrap())
}

fn openai_estimator(server: &MockServer) -> PriceEstimator {
    let ai = AiConfig {
        provider: AiProviderKind::OpenAi,
        api_key: "sk-test-key".to_string(),
        base_url: Some(server.base_url()),
        ..AiConfig::default()
    };
    PriceEstimator::new(PricingConfig::default(), build_generator(&ai).unwrap())
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_gemini_answer_is_used() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/gemini-test:generateContent")
                .query_param("key", "test-key")
                .body_includes("Nissan Leaf");
            then.status(200).json_body(gemini_reply(
                "```json\n{\"totalPrice\": \"$1,450\", \"materialsValue\": 990, \"reuseValue\": 720, \"processingFee\": 260, \"description\": \"Strong pack\"}\n```",
            ));
        })
        .await;

    let estimate = gemini_estimator(&server).estimate(&boundary_battery()).await;

    mock.assert_async().await;
    assert_eq!(
        estimate.source,
        EstimateSource::Model {
            provider: "gemini".to_string()
        }
    );
    assert_eq!(estimate.breakdown.total_price, 1450.0);
    assert_eq!(estimate.breakdown.materials_value, 990.0);
    assert_eq!(estimate.breakdown.processing_fee, -260.0);
    assert_eq!(estimate.breakdown.description, "Strong pack");
}

#[tokio::test]
async fn test_gemini_prose_falls_back_byte_for_byte() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/models/gemini-test:generateContent");
            then.status(200)
                .json_body(gemini_reply("I am unable to price batteries today."));
        })
        .await;

    let battery = BatteryAttributes {
        age_years: 3.0,
        condition_grade: ConditionGrade::Fair,
        ..boundary_battery()
    };
    let estimate = gemini_estimator(&server).estimate(&battery).await;
    let expected = PricingFormula::new(&PricingConfig::default()).compute(&battery);

    assert_eq!(
        serde_json::to_vec(&estimate.breakdown).unwrap(),
        serde_json::to_vec(&expected).unwrap()
    );
    assert_eq!(
        estimate.source,
        EstimateSource::Formula {
            reason: FallbackReason::MissingJson
        }
    );
}

#[tokio::test]
async fn test_upstream_500_falls_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/models/gemini-test:generateContent");
            then.status(500).body("backend unavailable");
        })
        .await;

    let estimate = gemini_estimator(&server).estimate(&boundary_battery()).await;

    assert_eq!(estimate.breakdown.total_price, 1000.0);
    assert_eq!(estimate.breakdown.materials_value, 700.0);
    assert_eq!(estimate.breakdown.reuse_value, 500.0);
    assert_eq!(estimate.breakdown.processing_fee, -200.0);
    assert_eq!(estimate.source.header_value(), "formula:upstream_error");
}

#[tokio::test]
async fn test_openai_invalid_json_falls_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(json!({
                "id": "chatcmpl-1",
                "model": "gpt-4o",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "{totalPrice: 1200,}"},
                    "finish_reason": "stop"
                }]
            }));
        })
        .await;

    let estimate = openai_estimator(&server).estimate(&boundary_battery()).await;
    assert_eq!(estimate.source.header_value(), "formula:invalid_json");
    assert_eq!(estimate.breakdown.total_price, 1000.0);
}

#[tokio::test]
async fn test_openai_answer_is_used() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer sk-test-key");
            then.status(200).json_body(json!({
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": "{\"totalPrice\": 880, \"materialsValue\": 600, \"reuseValue\": 440, \"processingFee\": -170}"
                    }
                }]
            }));
        })
        .await;

    let estimate = openai_estimator(&server).estimate(&boundary_battery()).await;
    assert_eq!(estimate.source.header_value(), "model:openai");
    assert_eq!(estimate.breakdown.total_price, 880.0);
    // No description in the model output
    assert_eq!(
        estimate.breakdown.description,
        PricingConfig::default().description
    );
}

#[tokio::test]
async fn test_unreachable_provider_falls_back() {
    // Nothing listens on port 9 (discard) in the test environment
    let ai = AiConfig {
        provider: AiProviderKind::OpenAi,
        api_key: "sk-test-key".to_string(),
        base_url: Some("http://127.0.0.1:9/v1".to_string()),
        timeout_seconds: Some(2),
        ..AiConfig::default()
    };
    let estimator = PriceEstimator::new(PricingConfig::default(), build_generator(&ai).unwrap());

    let estimate = estimator.estimate(&boundary_battery()).await;
    assert_eq!(estimate.source.header_value(), "formula:upstream_error");
    assert_eq!(estimate.breakdown.total_price, 1000.0);
}

#[tokio::test]
async fn test_extreme_age_keeps_floor() {
    let estimator = PriceEstimator::offline(PricingConfig::default());
    let battery = BatteryAttributes {
        age_years: 50.0,
        ..boundary_battery()
    };

    assert_eq!(PricingFormula::age_factor(50.0), 0.2);
    assert_eq!(estimator.estimate(&battery).await.breakdown.total_price, 200.0);
}

#[tokio::test]
async fn test_relaxed_caller_with_unknown_values() {
    let estimator = PriceEstimator::offline(PricingConfig::default());
    let battery = BatteryAttributes {
        category: BatteryCategory::from("sodium_ion"),
        condition_grade: ConditionGrade::from("refurbished"),
        ..boundary_battery()
    };

    // default rate 50 × 10 kWh × 1.0 × 0.5
    let estimate = estimator.estimate(&battery).await;
    assert_eq!(estimate.breakdown.total_price, 250.0);
    assert_eq!(estimate.breakdown.processing_fee, -50.0);
}
