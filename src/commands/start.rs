use anyhow::Result;
use battery_market::{config, server};
use std::path::Path;
use tracing::info;

/// Execute the start command
///
/// Loads configuration (built-in defaults when the file is absent) and runs
/// the server until SIGTERM/SIGINT.
pub async fn execute(config_path: &Path) -> Result<()> {
    let cfg = config::load_or_default(config_path)?;

    if config_path.exists() {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Configuration file not found, using defaults");
    }

    server::start_server(cfg).await
}
