//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reversal")]
#[command(author, version, about = "Weekly RSI reversal backtester")]
pub struct Cli {
    /// Configuration file path (optional; defaults apply when missing)
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the RSI reversal backtest
    Backtest(BacktestArgs),
    /// Validate configuration and print the effective values
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Symbol to test
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// RSI period
    #[arg(short, long)]
    pub period: Option<usize>,

    /// Buy when RSI falls below this
    #[arg(long)]
    pub buy: Option<f64>,

    /// Sell when RSI rises above this
    #[arg(long)]
    pub sell: Option<f64>,

    /// Annual risk-free rate for the Sharpe ratio
    #[arg(long)]
    pub risk_free: Option<f64>,

    /// Sampling periods per year
    #[arg(long)]
    pub periods_per_year: Option<u32>,

    /// Read prices from a CSV file instead of Yahoo Finance
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Augmented series CSV path
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Also save the full report as JSON
    #[arg(long)]
    pub save_report: Option<PathBuf>,

    /// Do not write the augmented series
    #[arg(long)]
    pub no_results: bool,
}
