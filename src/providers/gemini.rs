use crate::{
    config::AiConfig,
    error::AppError,
    models::gemini::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
        SafetySetting,
    },
    pricing::prompt::PricingPrompt,
};
use async_trait::async_trait;
use reqwest::Client;

use super::{check_status, TextGenerator};

/// Gemini generateContent backend. The API key travels as the `key` query parameter.
pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiGenerator {
    pub fn new(client: Client, config: &AiConfig) -> Self {
        Self {
            client,
            base_url: config.endpoint().to_string(),
            model: config.model_name().to_string(),
            api_key: config.api_key.clone(),
            safety_settings: config
                .safety_settings
                .iter()
                .map(|s| SafetySetting {
                    category: s.category.clone(),
                    threshold: s.threshold.clone(),
                })
                .collect(),
        }
    }

    fn build_request(&self, prompt: &PricingPrompt) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.combined(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: None,
                response_mime_type: Some("application/json".to_string()),
            }),
            safety_settings: if self.safety_settings.is_empty() {
                None
            } else {
                Some(self.safety_settings.clone())
            },
        }
    }
}

/// Request URLs carry the API key, so reqwest errors must not display them
fn redact_url(err: reqwest::Error) -> AppError {
    AppError::HttpRequest(err.without_url())
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &PricingPrompt) -> Result<String, AppError> {
        // Gemini API format: /v1beta/models/{model}:generateContent
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .query(&[("key", &self.api_key)])
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(redact_url)?;

        let body: GenerateContentResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(redact_url)?;

        body.text().ok_or_else(|| AppError::UpstreamError {
            status: reqwest::StatusCode::BAD_GATEWAY,
            message: "Gemini returned no text candidates".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiProviderKind;
    use httpmock::prelude::*;
    use serde_json::json;

    fn create_test_config(base_url: String) -> AiConfig {
        AiConfig {
            provider: AiProviderKind::Gemini,
            model: Some("gemini-test".to_string()),
            api_key: "test-key".to_string(),
            base_url: Some(base_url),
            ..AiConfig::default()
        }
    }

    fn prompt() -> PricingPrompt {
        PricingPrompt {
            system: "You appraise batteries.".to_string(),
            user: "Type: hybrid".to_string(),
        }
    }

    #[test]
    fn test_request_carries_safety_settings_and_json_mode() {
        let generator = GeminiGenerator::new(
            Client::new(),
            &create_test_config("http://localhost".to_string()),
        );
        let value = serde_json::to_value(generator.build_request(&prompt())).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert!(value["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Type: hybrid"));
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            value["safetySettings"][0]["category"],
            "HARM_CATEGORY_HARASSMENT"
        );
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/gemini-test:generateContent")
                    .query_param("key", "test-key");
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "{\"totalPrice\": "}, {"text": "640}"}]},
                        "finishReason": "STOP"
                    }]
                }));
            })
            .await;

        let generator = GeminiGenerator::new(Client::new(), &create_test_config(server.base_url()));
        let text = generator.generate(&prompt()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "{\"totalPrice\": 640}");
    }

    #[tokio::test]
    async fn test_upstream_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/gemini-test:generateContent");
                then.status(429).body("quota exceeded");
            })
            .await;

        let generator = GeminiGenerator::new(Client::new(), &create_test_config(server.base_url()));
        let err = generator.generate(&prompt()).await.unwrap_err();

        match err {
            AppError::UpstreamError { status, message } => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_blocked_prompt_has_no_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/gemini-test:generateContent");
                then.status(200)
                    .json_body(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
            })
            .await;

        let generator = GeminiGenerator::new(Client::new(), &create_test_config(server.base_url()));
        assert!(generator.generate(&prompt()).await.is_err());
    }
}
