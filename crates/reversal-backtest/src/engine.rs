//! Backtesting engine.

use chrono::NaiveDate;
use reversal_core::error::{BacktestError, StrategyError};
use reversal_core::traits::{DataSource, StrategyConfig};
use reversal_core::types::{BacktestRow, PriceSeries, Timeframe};
use reversal_signals::{RsiReversalConfig, RsiReversalStrategy};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::report::BacktestReport;
use crate::returns::calculate_returns;
use crate::statistics::PerformanceAnalyzer;

/// Backtest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// RSI period and thresholds
    pub strategy: RsiReversalConfig,
    /// Annual risk-free rate used for the Sharpe ratio
    pub risk_free_rate: f64,
    /// Sampling periods per year (52 for weekly bars)
    pub periods_per_year: u32,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            strategy: RsiReversalConfig::default(),
            risk_free_rate: 0.01,
            periods_per_year: Timeframe::Weekly.periods_per_year(),
        }
    }
}

impl BacktestConfig {
    /// Check strategy parameters and annualization settings.
    pub fn validate(&self) -> Result<(), BacktestError> {
        self.strategy.validate()?;
        if self.periods_per_year == 0 {
            return Err(StrategyError::InvalidConfig(
                "Periods per year must be at least 1".into(),
            )
            .into());
        }
        if !self.risk_free_rate.is_finite() {
            return Err(StrategyError::InvalidConfig(
                "Risk-free rate must be a finite number".into(),
            )
            .into());
        }
        Ok(())
    }
}

/// Backtesting engine.
///
/// Holds a validated configuration; every run is a pure function of the
/// price series it is given.
pub struct BacktestEngine {
    config: BacktestConfig,
    strategy: RsiReversalStrategy,
    analyzer: PerformanceAnalyzer,
}

impl BacktestEngine {
    /// Create a new backtest engine, rejecting invalid parameters.
    pub fn new(config: BacktestConfig) -> Result<Self, BacktestError> {
        config.validate()?;
        let strategy = RsiReversalStrategy::new(config.strategy.clone());
        let analyzer = PerformanceAnalyzer::new(config.risk_free_rate, config.periods_per_year);
        Ok(Self {
            config,
            strategy,
            analyzer,
        })
    }

    /// Run a backtest over an already loaded series.
    pub fn run(&self, prices: &PriceSeries) -> BacktestReport {
        info!(
            strategy = self.strategy.name(),
            symbol = %prices.symbol,
            bars = prices.len(),
            period = self.config.strategy.period,
            buy = self.config.strategy.buy_threshold,
            sell = self.config.strategy.sell_threshold,
            "Starting backtest"
        );

        let output = self.strategy.evaluate(prices);
        let returns = calculate_returns(prices, &output.positions);
        let performance = self.analyzer.analyze(prices, &returns, &output.trades);

        let rows: Vec<BacktestRow> = prices
            .iter()
            .zip(&output.rsi)
            .zip(&output.signals)
            .zip(&output.positions)
            .zip(&returns)
            .map(|((((point, rsi), &signal), &position), ret)| BacktestRow {
                date: point.timestamp,
                close: point.close,
                rsi: rsi.value,
                signal,
                position,
                asset_return: ret.asset_return,
                strategy_return: ret.strategy_return,
            })
            .collect();

        info!(
            symbol = %prices.symbol,
            total_return = performance.total_return,
            trades = performance.trade_count,
            "Backtest complete"
        );

        BacktestReport {
            symbol: prices.symbol.clone(),
            config: self.config.clone(),
            performance,
            rows,
            trades: output.trades,
        }
    }

    /// Fetch prices from a provider and run.
    ///
    /// A provider failure aborts the run; no partial report is produced.
    pub async fn fetch_and_run(
        &self,
        source: &dyn DataSource,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BacktestReport, BacktestError> {
        if start >= end {
            return Err(BacktestError::Config(format!(
                "Start date {} must be before end date {}",
                start, end
            )));
        }

        info!(source = source.name(), symbol, %timeframe, %start, %end, "Fetching prices");
        let prices = source.fetch_prices(symbol, timeframe, start, end).await?;

        if prices.is_empty() {
            warn!(symbol, "Provider returned no prices");
        }

        Ok(self.run(&prices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reversal_core::error::DataError;
    use reversal_core::types::{Position, Signal};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 1, 2).unwrap()
    }

    fn falling_then_rising() -> PriceSeries {
        let mut closes: Vec<f64> = (0..20).map(|i| 200.0 - 5.0 * i as f64).collect();
        closes.extend((1..=20).map(|i| 105.0 + 5.0 * i as f64));
        PriceSeries::weekly_from_closes("TEST", start(), &closes).unwrap()
    }

    struct FixedSource(PriceSeries);

    #[async_trait]
    impl DataSource for FixedSource {
        async fn fetch_prices(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<PriceSeries, DataError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingSource;

    #[async_trait]
    impl DataSource for FailingSource {
        async fn fetch_prices(
            &self,
            symbol: &str,
            _timeframe: Timeframe,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<PriceSeries, DataError> {
            Err(DataError::HttpStatus {
                status: 503,
                symbol: symbol.to_string(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BacktestConfig::default();
        config.strategy.buy_threshold = 80.0;
        assert!(BacktestEngine::new(config).is_err());

        let config = BacktestConfig {
            periods_per_year: 0,
            ..Default::default()
        };
        assert!(BacktestEngine::new(config).is_err());
    }

    #[test]
    fn test_reversal_scenario() {
        let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
        let prices = falling_then_rising();
        let report = engine.run(&prices);

        assert_eq!(report.rows.len(), prices.len());
        assert_eq!(report.performance.trade_count, 1);
        assert!(!report.performance.open_trade);
        assert_eq!(report.rows[0].signal, Signal::None);
        assert_eq!(report.rows[0].position, Position::Flat);
        assert_eq!(report.rows[14].position, Position::Long);
        // Entry bar does not earn; the next one does
        assert_eq!(report.rows[14].strategy_return, Some(0.0));
        assert!((report.rows[15].strategy_return.unwrap() + 5.0 / 130.0).abs() < 1e-12);
        // Entered at 130, exited at 160 on bar 30
        assert_eq!(report.rows[30].position, Position::Flat);
        assert!((report.performance.total_return - (160.0 / 130.0 - 1.0)).abs() < 1e-9);
        // 5 losing weeks before the turn, 11 winning weeks after
        assert!((report.performance.win_rate.unwrap() - 11.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_series() {
        let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
        let prices =
            PriceSeries::weekly_from_closes("TEST", start(), &[100.0, 101.0, 99.0]).unwrap();
        let report = engine.run(&prices);

        assert!(report.rows.iter().all(|r| r.rsi.is_none()));
        assert!(report.rows.iter().all(|r| r.position == Position::Flat));
        assert_eq!(report.performance.total_return, 0.0);
        assert_eq!(report.performance.trade_count, 0);
    }

    #[test]
    fn test_flat_series() {
        let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
        let prices = PriceSeries::weekly_from_closes("TEST", start(), &[42.0; 40]).unwrap();
        let report = engine.run(&prices);

        assert_eq!(report.performance.trade_count, 0);
        assert_eq!(report.performance.variance, Some(0.0));
        assert_eq!(report.performance.sharpe_ratio, None);
        assert_eq!(report.performance.win_rate, None);
    }

    #[tokio::test]
    async fn test_fetch_and_run() {
        let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
        let source = FixedSource(falling_then_rising());
        let end = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();

        let report = engine
            .fetch_and_run(&source, "TEST", Timeframe::Weekly, start(), end)
            .await
            .unwrap();
        assert_eq!(report.performance.trade_count, 1);
    }

    #[tokio::test]
    async fn test_provider_failure_is_fatal() {
        let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
        let end = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();

        let result = engine
            .fetch_and_run(&FailingSource, "TEST", Timeframe::Weekly, start(), end)
            .await;
        assert!(matches!(result, Err(BacktestError::Data(_))));
    }

    #[tokio::test]
    async fn test_reversed_range_rejected() {
        let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
        let source = FixedSource(falling_then_rising());

        let result = engine
            .fetch_and_run(&source, "TEST", Timeframe::Weekly, start(), start())
            .await;
        assert!(matches!(result, Err(BacktestError::Config(_))));
    }
}
