//! Moving average indicators.

use reversal_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values. Each window is
/// summed from scratch so an all-zero window averages to exactly zero.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let warmup = (self.period - 1).min(data.len());
        let period_f64 = self.period as f64;

        std::iter::repeat(None)
            .take(warmup)
            .chain(
                data.windows(self.period)
                    .map(|window| Some(window.iter().sum::<f64>() / period_f64)),
            )
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma.calculate(&data);

        assert_eq!(result.len(), 5);
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert!((result[2].unwrap() - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[3].unwrap() - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[4].unwrap() - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        let result = sma.calculate(&[1.0, 2.0, 3.0]);

        assert_eq!(result, vec![None, None, None]);
        assert!(sma.validate_data(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_sma_zero_window_is_exact() {
        let sma = Sma::new(2);
        let result = sma.calculate(&[0.3, 0.0, 0.0, 0.0]);

        assert_eq!(result[3], Some(0.0));
    }
}
