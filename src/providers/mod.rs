pub mod gemini;
pub mod openai;

use crate::config::{AiConfig, AiProviderKind};
use crate::error::AppError;
use crate::pricing::prompt::PricingPrompt;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub use gemini::GeminiGenerator;
pub use openai::OpenAiGenerator;

/// Text-generation backend used for price estimates.
///
/// Implementations make exactly one upstream call per `generate` and
/// return the raw model text. Parsing is left to the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync + 'static {
    /// Provider name (e.g. "gemini", "openai")
    fn provider_name(&self) -> &str;

    async fn generate(&self, prompt: &PricingPrompt) -> Result<String, AppError>;
}

/// Build the generator selected by `[ai].provider`, or `None` when disabled
pub fn build_generator(config: &AiConfig) -> anyhow::Result<Option<Arc<dyn TextGenerator>>> {
    if config.provider == AiProviderKind::None {
        return Ok(None);
    }

    let mut builder = Client::builder();
    if let Some(secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build()?;

    let generator: Arc<dyn TextGenerator> = match config.provider {
        AiProviderKind::Gemini => Arc::new(GeminiGenerator::new(client, config)),
        AiProviderKind::OpenAi => Arc::new(OpenAiGenerator::new(client, config)),
        AiProviderKind::None => return Ok(None),
    };

    Ok(Some(generator))
}

/// Turn a non-2xx upstream response into an `UpstreamError`
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(AppError::UpstreamError {
        status,
        message: error_text,
    })
}
