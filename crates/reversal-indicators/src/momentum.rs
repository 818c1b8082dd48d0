//! Momentum indicators.

use reversal_core::traits::Indicator;
use reversal_core::types::{PriceSeries, RsiPoint};

use crate::simd::gains_losses_simd;
use crate::Sma;

/// Relative Strength Index (RSI).
///
/// Uses simple moving averages of gains and losses over `period` price
/// changes, so the first defined value appears at index `period`.
///
/// When the average loss is zero the relative strength is infinite and the
/// RSI saturates at 100. When both averages are zero prices did not move and
/// the value is undefined.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// RSI from average gain and average loss.
    pub fn from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
        if avg_loss == 0.0 {
            if avg_gain > 0.0 {
                Some(100.0)
            } else {
                None
            }
        } else {
            Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
        }
    }

    /// Calculate RSI points aligned with a price series.
    pub fn series(&self, prices: &PriceSeries) -> Vec<RsiPoint> {
        let values = self.calculate(&prices.closes());
        prices
            .iter()
            .zip(values)
            .map(|(point, value)| RsiPoint {
                timestamp: point.timestamp,
                value,
            })
            .collect()
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        if data.is_empty() {
            return vec![];
        }

        let (gains, losses) = gains_losses_simd(data);
        let sma = Sma::new(self.period);
        let avg_gains = sma.calculate(&gains);
        let avg_losses = sma.calculate(&losses);

        // No change is defined for the first bar.
        std::iter::once(None)
            .chain(
                avg_gains
                    .into_iter()
                    .zip(avg_losses)
                    .map(|averages| match averages {
                        (Some(gain), Some(loss)) => Self::from_averages(gain, loss),
                        _ => None,
                    }),
            )
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}
