//! Weekly RSI reversal backtester.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use reversal_config::load_config;
use reversal_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Setup logging
    let log_level = cli
        .log_level
        .map(|level| level.as_str())
        .unwrap_or(config.logging.level.as_str());
    setup_logging(log_level, cli.json_logs || config.logging.is_json());

    // Execute command
    match cli.command {
        Commands::Backtest(args) => cli::commands::backtest::run(args, config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, &config).await,
    }
}
