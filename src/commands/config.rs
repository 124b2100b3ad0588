use anyhow::Result;
use battery_market::config::{self, Config};
use battery_market::logging::SensitiveApiKey;
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with secrets masked
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_or_default(config_path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    info!("Configuration displayed successfully");
    Ok(())
}

/// Sanitize secrets in configuration for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    if !sanitized.ai.api_key.is_empty() {
        sanitized.ai.api_key = SensitiveApiKey::new(&cfg.ai.api_key).to_string();
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use battery_market::config::AiProviderKind;

    #[test]
    fn test_sanitized_config_serializes() {
        let mut cfg = Config::default();
        cfg.ai.provider = AiProviderKind::Gemini;
        cfg.ai.api_key = "AIzaSyD-very-long-key-1234".to_string();

        let rendered = toml::to_string_pretty(&sanitize_secrets(&cfg)).unwrap();
        // Same masking as the startup log
        let masked = SensitiveApiKey::new(&cfg.ai.api_key).to_string();
        assert_eq!(masked, "AIzaSyD-***");
        assert!(rendered.contains("api_key = \"AIzaSyD-***\""));
        assert!(!rendered.contains("very-long"));
        assert!(!rendered.contains("1234"));
        assert!(rendered.contains("provider = \"gemini\""));
    }
}
