use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::battery::BatteryCategory;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Deterministic pricing parameters.
///
/// The defaults are the canonical table. A deployment that prices in another
/// currency replaces the whole table, rounding unit and currency together.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_rounding_unit")]
    pub rounding_unit: f64,
    #[serde(default = "default_description")]
    pub description: String,
    /// Optional market context injected into the AI prompt (e.g. "India")
    #[serde(default)]
    pub market_context: Option<String>,
    #[serde(default)]
    pub base_rates: BaseRates,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            rounding_unit: default_rounding_unit(),
            description: default_description(),
            market_context: None,
            base_rates: BaseRates::default(),
        }
    }
}

/// Currency per kWh, keyed by battery category
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BaseRates {
    pub ev_standard: f64,
    pub ev_premium: f64,
    pub hybrid: f64,
    pub energy_storage: f64,
    pub other: f64,
    /// Rate for categories outside the known set
    #[serde(rename = "default")]
    pub unknown: f64,
}

impl Default for BaseRates {
    fn default() -> Self {
        Self {
            ev_standard: 100.0,
            ev_premium: 150.0,
            hybrid: 80.0,
            energy_storage: 120.0,
            other: 60.0,
            unknown: 50.0,
        }
    }
}

impl BaseRates {
    pub fn rate_for(&self, category: &BatteryCategory) -> f64 {
        match category {
            BatteryCategory::EvStandard => self.ev_standard,
            BatteryCategory::EvPremium => self.ev_premium,
            BatteryCategory::Hybrid => self.hybrid,
            BatteryCategory::EnergyStorage => self.energy_storage,
            BatteryCategory::Other => self.other,
            BatteryCategory::Unrecognized(_) => self.unknown,
        }
    }

    fn known(&self) -> [f64; 5] {
        [
            self.ev_standard,
            self.ev_premium,
            self.hybrid,
            self.energy_storage,
            self.other,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    #[default]
    None,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    #[serde(default)]
    pub provider: AiProviderKind,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Client-wide timeout; unset leaves reqwest's default in place
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default = "default_safety_settings")]
    pub safety_settings: Vec<SafetySettingConfig>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProviderKind::None,
            model: None,
            api_key: String::new(),
            base_url: None,
            timeout_seconds: None,
            safety_settings: default_safety_settings(),
        }
    }
}

impl AiConfig {
    pub fn model_name(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, AiProviderKind::Gemini) => "gemini-1.5-pro",
            (None, AiProviderKind::OpenAi) => "gpt-4o",
            (None, AiProviderKind::None) => "",
        }
    }

    pub fn endpoint(&self) -> &str {
        match (&self.base_url, self.provider) {
            (Some(url), _) => url.trim_end_matches('/'),
            (None, AiProviderKind::Gemini) => "https://generativelanguage.googleapis.com/v1beta",
            (None, AiProviderKind::OpenAi) => "https://api.openai.com/v1",
            (None, AiProviderKind::None) => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SafetySettingConfig {
    pub category: String,
    pub threshold: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "/metrics".to_string(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_rounding_unit() -> f64 {
    10.0
}

fn default_description() -> String {
    "Estimate based on battery type, capacity, age and condition at current recycling market rates"
        .to_string()
}

fn default_safety_settings() -> Vec<SafetySettingConfig> {
    ["HARM_CATEGORY_HARASSMENT", "HARM_CATEGORY_HATE_SPEECH"]
        .iter()
        .map(|category| SafetySettingConfig {
            category: category.to_string(),
            threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
        })
        .collect()
}

/// Load configuration from a TOML file layered with `BATTERY_MARKET__*` env vars
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    load(path, true)
}

/// Like [`load_config`], but a missing file leaves the built-in defaults in place
pub fn load_or_default(path: &Path) -> anyhow::Result<Config> {
    load(path, false)
}

fn load(path: &Path, required: bool) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(required))
        .add_source(config::Environment::with_prefix("BATTERY_MARKET").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        anyhow::bail!("Server port must be non-zero");
    }

    if !matches!(cfg.server.log_format.as_str(), "text" | "json") {
        anyhow::bail!("Invalid log format: {} (expected text or json)", cfg.server.log_format);
    }

    let pricing = &cfg.pricing;
    if !(pricing.rounding_unit.is_finite() && pricing.rounding_unit > 0.0) {
        anyhow::bail!("Pricing rounding unit must be a positive number");
    }

    let rates = &pricing.base_rates;
    for rate in rates.known().iter().chain(std::iter::once(&rates.unknown)) {
        if !rate.is_finite() || *rate < 0.0 {
            anyhow::bail!("Base rates must be non-negative numbers");
        }
    }

    // Unknown categories must never out-price a known one
    if rates.known().iter().any(|rate| rates.unknown > *rate) {
        anyhow::bail!("Default base rate must not exceed any category rate");
    }

    if cfg.ai.provider != AiProviderKind::None && cfg.ai.api_key.trim().is_empty() {
        anyhow::bail!("AI provider {:?} is enabled but no API key is configured", cfg.ai.provider);
    }

    Ok(())
}
