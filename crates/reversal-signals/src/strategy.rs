//! RSI reversal strategy.
//!
//! Buys when RSI drops below the oversold threshold and exits when it rises
//! above the overbought threshold. Long-only, one unit, no pyramiding.

use reversal_core::types::{Position, PriceSeries, RsiPoint, Signal, Trade};
use reversal_indicators::Rsi;
use tracing::{debug, info, warn};

use crate::{extract_trades, run_position_machine, RsiReversalConfig, SignalGenerator};

/// Per-bar decisions for a price series, all aligned by index.
#[derive(Debug, Clone)]
pub struct StrategyOutput {
    pub rsi: Vec<RsiPoint>,
    pub signals: Vec<Signal>,
    pub positions: Vec<Position>,
    /// Closed round trips followed by at most one open trade
    pub trades: Vec<Trade>,
}

/// RSI reversal strategy.
pub struct RsiReversalStrategy {
    config: RsiReversalConfig,
    rsi: Rsi,
    signal_generator: SignalGenerator,
}

impl RsiReversalStrategy {
    /// Create a new RSI reversal strategy.
    ///
    /// The configuration is expected to have passed `StrategyConfig::validate`.
    pub fn new(config: RsiReversalConfig) -> Self {
        let rsi = Rsi::new(config.period);
        let signal_generator = SignalGenerator::from_config(&config);
        Self {
            config,
            rsi,
            signal_generator,
        }
    }

    pub fn name(&self) -> &str {
        "RSI Reversal"
    }

    /// Bars needed before the first defined RSI.
    pub fn warmup_period(&self) -> usize {
        self.config.period + 1
    }

    /// Run RSI, signal generation and the position machine over a series.
    pub fn evaluate(&self, prices: &PriceSeries) -> StrategyOutput {
        if prices.len() < self.warmup_period() {
            warn!(
                symbol = %prices.symbol,
                bars = prices.len(),
                required = self.warmup_period(),
                "Series shorter than RSI warmup; no signals will be generated"
            );
        }

        let rsi = self.rsi.series(prices);
        let signals = self.signal_generator.generate(&rsi);
        debug!(
            buys = signals.iter().filter(|s| **s == Signal::Buy).count(),
            sells = signals.iter().filter(|s| **s == Signal::Sell).count(),
            "Signals generated"
        );

        let positions = run_position_machine(&signals);
        log_transitions(prices, &rsi, &positions);
        let trades = extract_trades(prices, &positions);

        StrategyOutput {
            rsi,
            signals,
            positions,
            trades,
        }
    }
}

/// Log every entry and exit with the bar's close and RSI.
fn log_transitions(prices: &PriceSeries, rsi: &[RsiPoint], positions: &[Position]) {
    let mut previous = Position::Flat;
    for ((point, rsi), &position) in prices.iter().zip(rsi).zip(positions) {
        if position != previous {
            let action = if position.is_long() { "Buy" } else { "Sell" };
            info!(
                symbol = %prices.symbol,
                date = %point.timestamp,
                price = point.close,
                rsi = rsi.value.unwrap_or(f64::NAN),
                "{}",
                action
            );
        }
        previous = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2017, 1, 2).unwrap();
        PriceSeries::weekly_from_closes("TEST", start, closes).unwrap()
    }

    #[test]
    fn test_falling_then_rising_single_trade() {
        // 20 falling weeks, then 20 rising weeks
        let mut closes: Vec<f64> = (0..20).map(|i| 200.0 - 5.0 * i as f64).collect();
        closes.extend((1..=20).map(|i| 105.0 + 5.0 * i as f64));

        let strategy = RsiReversalStrategy::new(RsiReversalConfig::default());
        let output = strategy.evaluate(&series(&closes));

        // First full window at index 14 is all losses
        assert_eq!(output.rsi[13].value, None);
        assert_eq!(output.rsi[14].value, Some(0.0));
        assert_eq!(output.signals[14], Signal::Buy);
        assert_eq!(output.positions[13], Position::Flat);
        assert_eq!(output.positions[14], Position::Long);

        let closed: Vec<&Trade> = output.trades.iter().filter(|t| t.is_closed()).collect();
        assert_eq!(closed.len(), 1);
        assert_eq!(output.trades.len(), 1);
        assert_eq!(*output.positions.last().unwrap(), Position::Flat);
    }

    #[test]
    fn test_short_series_stays_flat() {
        let strategy = RsiReversalStrategy::new(RsiReversalConfig::default());
        let output = strategy.evaluate(&series(&[100.0, 90.0, 80.0, 70.0]));

        assert!(output.rsi.iter().all(|p| p.value.is_none()));
        assert!(output.signals.iter().all(|s| *s == Signal::None));
        assert!(output.positions.iter().all(|p| *p == Position::Flat));
        assert!(output.trades.is_empty());
    }

    #[test]
    fn test_first_bar_is_flat_without_signal() {
        let strategy = RsiReversalStrategy::new(RsiReversalConfig {
            period: 1,
            ..Default::default()
        });
        let output = strategy.evaluate(&series(&[100.0, 90.0, 95.0]));

        assert_eq!(output.signals[0], Signal::None);
        assert_eq!(output.positions[0], Position::Flat);
        assert_eq!(output.signals[1], Signal::Buy);
        assert_eq!(output.signals[2], Signal::Sell);
    }
}
