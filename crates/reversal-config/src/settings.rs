//! Configuration structures.

use std::path::PathBuf;

use chrono::NaiveDate;
use reversal_backtest::BacktestConfig;
use reversal_signals::RsiReversalConfig;
use serde::{Deserialize, Serialize};

use crate::SettingsError;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl AppConfig {
    /// Reject parameter combinations the engine cannot run with.
    ///
    /// `today` resolves an unset end date.
    pub fn validate(&self, today: NaiveDate) -> Result<(), SettingsError> {
        self.backtest
            .to_backtest_config()
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))?;

        let end = self.backtest.end_date(today);
        if self.backtest.start >= end {
            return Err(SettingsError::Invalid(format!(
                "Start date {} must be before end date {}",
                self.backtest.start, end
            )));
        }
        if self.backtest.symbol.trim().is_empty() {
            return Err(SettingsError::Invalid("Symbol must not be empty".into()));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Render(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "reversal".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Backtest settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    pub symbol: String,
    pub start: NaiveDate,
    /// Unset means today
    pub end: Option<NaiveDate>,
    pub rsi_period: usize,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
    pub risk_free_rate: f64,
    pub periods_per_year: u32,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        let strategy = RsiReversalConfig::default();
        let engine = BacktestConfig::default();
        Self {
            symbol: "BTC-USD".to_string(),
            start: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or_default(),
            end: None,
            rsi_period: strategy.period,
            buy_threshold: strategy.buy_threshold,
            sell_threshold: strategy.sell_threshold,
            risk_free_rate: engine.risk_free_rate,
            periods_per_year: engine.periods_per_year,
        }
    }
}

impl BacktestSettings {
    /// End of the backtest window.
    pub fn end_date(&self, today: NaiveDate) -> NaiveDate {
        self.end.unwrap_or(today)
    }

    /// Engine parameters for these settings.
    pub fn to_backtest_config(&self) -> BacktestConfig {
        BacktestConfig {
            strategy: RsiReversalConfig {
                period: self.rsi_period,
                buy_threshold: self.buy_threshold,
                sell_threshold: self.sell_threshold,
            },
            risk_free_rate: self.risk_free_rate,
            periods_per_year: self.periods_per_year,
        }
    }
}

/// Result persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Augmented series CSV
    pub results_path: PathBuf,
    pub write_results: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from("backtest_results.csv"),
            write_results: true,
        }
    }
}
