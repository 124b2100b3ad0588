use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "battery-market",
    version,
    about = "Battery recycling marketplace and price estimator"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the marketplace server (default)
    Start,

    /// Test configuration file validity
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Estimate the recycling value of one battery and print it as JSON
    Estimate(EstimateArgs),

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Battery type (ev_standard, ev_premium, hybrid, energy_storage, other)
    #[arg(long = "type")]
    pub battery_type: String,

    /// Model label, e.g. "Nissan Leaf 40kWh"
    #[arg(long)]
    pub model: String,

    /// Age in years
    #[arg(long)]
    pub age: f64,

    /// Capacity in kWh
    #[arg(long)]
    pub capacity: f64,

    /// Condition (excellent, good, fair, poor, damaged)
    #[arg(long)]
    pub condition: String,

    /// Skip the AI provider and use the pricing formula only
    #[arg(long)]
    pub offline: bool,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}
