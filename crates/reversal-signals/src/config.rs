//! RSI reversal parameters.

use reversal_core::{error::StrategyError, traits::StrategyConfig};
use serde::{Deserialize, Serialize};

/// Configuration for the RSI reversal rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiReversalConfig {
    /// RSI calculation period
    pub period: usize,
    /// Oversold threshold (buy below this)
    pub buy_threshold: f64,
    /// Overbought threshold (sell above this)
    pub sell_threshold: f64,
}

impl Default for RsiReversalConfig {
    fn default() -> Self {
        Self {
            period: 14,
            buy_threshold: 25.0,
            sell_threshold: 75.0,
        }
    }
}

impl StrategyConfig for RsiReversalConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.period == 0 {
            return Err(StrategyError::InvalidConfig(
                "RSI period must be at least 1".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.buy_threshold)
            || !(0.0..=100.0).contains(&self.sell_threshold)
        {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must be between 0 and 100".into(),
            ));
        }
        if self.buy_threshold >= self.sell_threshold {
            return Err(StrategyError::InvalidConfig(
                "Buy threshold must be below sell threshold".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RsiReversalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.period, 14);
    }

    #[test]
    fn test_config_validation() {
        let mut config = RsiReversalConfig {
            buy_threshold: 75.0,
            sell_threshold: 25.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.buy_threshold = 25.0;
        config.sell_threshold = 25.0;
        assert!(config.validate().is_err());

        config.sell_threshold = 120.0;
        assert!(config.validate().is_err());

        config.sell_threshold = 75.0;
        config.period = 0;
        assert!(config.validate().is_err());

        // NaN thresholds fail the range check
        config.period = 14;
        config.buy_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }
}
