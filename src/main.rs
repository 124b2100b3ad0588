use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use battery_market::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Log settings come from the config file when it is readable; commands
    // report load errors themselves
    let (level, format) = match config::load_or_default(&args.config) {
        Ok(cfg) => (cfg.server.log_level, cfg.server.log_format),
        Err(_) => ("info".to_string(), "text".to_string()),
    };
    init_tracing(&level, &format);

    match args.get_command() {
        cli::Commands::Start => {
            commands::start::execute(&args.config).await?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
        },
        cli::Commands::Estimate(estimate_args) => {
            commands::estimate::execute(&args.config, estimate_args).await?;
        }
        cli::Commands::Version => {
            println!("Battery Market v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
