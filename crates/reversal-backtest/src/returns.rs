//! Period and strategy returns.

use reversal_core::types::{Position, PriceSeries, ReturnPoint};
use reversal_indicators::simd::pct_change_simd;

/// Compute asset and strategy returns for every bar.
///
/// `strategy_return[t]` is earned by the position held entering bar `t`,
/// which is `positions[t - 1]` (flat before the first bar). A position
/// entered on bar `t` therefore only starts earning on bar `t + 1`.
///
/// Both returns are `None` on the first bar and wherever the ratio of
/// consecutive closes overflows.
pub fn calculate_returns(prices: &PriceSeries, positions: &[Position]) -> Vec<ReturnPoint> {
    let asset_returns = pct_change_simd(&prices.closes());

    prices
        .iter()
        .enumerate()
        .map(|(t, point)| {
            let asset_return = t
                .checked_sub(1)
                .and_then(|prev| asset_returns.get(prev))
                .copied()
                .filter(|r| r.is_finite());

            let held = t
                .checked_sub(1)
                .and_then(|prev| positions.get(prev))
                .copied()
                .unwrap_or(Position::Flat);

            // Adding 0.0 turns the -0.0 of a flat bar on a falling close into 0.0
            let strategy_return = asset_return.map(|r| held.exposure() * r + 0.0);

            ReturnPoint {
                timestamp: point.timestamp,
                asset_return,
                strategy_return,
            }
        })
        .collect()
}

/// Strategy returns with undefined bars dropped.
pub fn defined_strategy_returns(returns: &[ReturnPoint]) -> Vec<f64> {
    returns.iter().filter_map(|p| p.strategy_return).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use reversal_core::types::Position::{Flat, Long};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::weekly_from_closes("TEST", start, closes).unwrap()
    }

    #[test]
    fn test_first_bar_undefined() {
        let returns = calculate_returns(&series(&[100.0, 110.0]), &[Flat, Flat]);

        assert_eq!(returns[0].asset_return, None);
        assert_eq!(returns[0].strategy_return, None);
        assert!((returns[1].asset_return.unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(returns[1].strategy_return, Some(0.0));
    }

    #[test]
    fn test_position_lag() {
        let prices = series(&[100.0, 110.0, 121.0, 108.9]);
        // Entered on bar 1, exited on bar 3
        let returns = calculate_returns(&prices, &[Flat, Long, Long, Flat]);

        // Bar 1 return is not captured: the position was decided on bar 1
        assert_eq!(returns[1].strategy_return, Some(0.0));
        assert!((returns[2].strategy_return.unwrap() - 0.1).abs() < 1e-12);
        // Exit bar still earns: position entering bar 3 was long
        assert!((returns[3].strategy_return.unwrap() + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_no_look_ahead() {
        let positions = [Flat, Long, Long, Long];
        let base = calculate_returns(&series(&[100.0, 90.0, 95.0, 99.0]), &positions);
        let altered = calculate_returns(&series(&[100.0, 90.0, 95.0, 50.0]), &positions);

        // Changing the last close changes only the last bar
        assert_eq!(&base[..3], &altered[..3]);
        assert_ne!(base[3].strategy_return, altered[3].strategy_return);
    }

    #[test]
    fn test_overflowing_return_guarded() {
        let returns = calculate_returns(&series(&[f64::MIN_POSITIVE, f64::MAX]), &[Long, Long]);
        assert_eq!(returns[1].asset_return, None);
        assert_eq!(returns[1].strategy_return, None);
    }

    #[test]
    fn test_defined_strategy_returns() {
        let returns = calculate_returns(&series(&[100.0, 110.0, 99.0]), &[Long, Long, Long]);
        let defined = defined_strategy_returns(&returns);

        assert_eq!(defined.len(), 2);
        assert!((defined[0] - 0.1).abs() < 1e-12);
        assert!((defined[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_empty_series() {
        assert!(calculate_returns(&series(&[]), &[]).is_empty());
    }
}
