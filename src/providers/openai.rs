use crate::{
    config::AiConfig,
    error::AppError,
    models::openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat},
    pricing::prompt::PricingPrompt,
};
use async_trait::async_trait;
use reqwest::Client;

use super::{check_status, TextGenerator};

/// OpenAI chat completions backend (also OpenAI-compatible services)
pub struct OpenAiGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiGenerator {
    pub fn new(client: Client, config: &AiConfig) -> Self {
        Self {
            client,
            base_url: config.endpoint().to_string(),
            model: config.model_name().to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn build_request(&self, prompt: &PricingPrompt) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompt.system.clone()),
                ChatMessage::user(prompt.user.clone()),
            ],
            temperature: None,
            response_format: Some(ResponseFormat::JsonObject),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &PricingPrompt) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let body: ChatCompletionResponse = check_status(response).await?.json().await?;

        body.text().ok_or_else(|| AppError::UpstreamError {
            status: reqwest::StatusCode::BAD_GATEWAY,
            message: "OpenAI returned an empty completion".to_string(),
        })
    }
}
