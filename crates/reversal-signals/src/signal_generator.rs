//! Threshold signal generation.

use reversal_core::types::{RsiPoint, Signal};

use crate::RsiReversalConfig;

/// Maps RSI values to trade intents.
///
/// Stateless: the same RSI always produces the same signal regardless of
/// what position is held.
#[derive(Debug, Clone, Copy)]
pub struct SignalGenerator {
    buy_threshold: f64,
    sell_threshold: f64,
}

impl SignalGenerator {
    /// Create a generator with explicit thresholds.
    pub fn new(buy_threshold: f64, sell_threshold: f64) -> Self {
        debug_assert!(buy_threshold < sell_threshold);
        Self {
            buy_threshold,
            sell_threshold,
        }
    }

    /// Create a generator from strategy configuration.
    pub fn from_config(config: &RsiReversalConfig) -> Self {
        Self::new(config.buy_threshold, config.sell_threshold)
    }

    /// Classify a single RSI value.
    pub fn classify(&self, rsi: Option<f64>) -> Signal {
        match rsi {
            Some(value) if value < self.buy_threshold => Signal::Buy,
            Some(value) if value > self.sell_threshold => Signal::Sell,
            _ => Signal::None,
        }
    }

    /// Classify every point of an RSI sequence.
    pub fn generate(&self, rsi: &[RsiPoint]) -> Vec<Signal> {
        rsi.iter().map(|point| self.classify(point.value)).collect()
    }
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self::from_config(&RsiReversalConfig::default())
    }
}
