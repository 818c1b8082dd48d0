//! Performance statistics.
//!
//! Every metric is a pure reduction over the strategy return series.
//! Degenerate inputs (too few returns, zero volatility, no trades) produce
//! `None` rather than an error or a NaN.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reversal_core::types::{PriceSeries, ReturnPoint, Trade};
use serde::{Deserialize, Serialize};

use crate::returns::defined_strategy_returns;

/// Standard deviations below this are treated as zero.
const MIN_STD_DEV: f64 = 1e-15;

/// Summary statistics for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Symbol tested
    pub symbol: String,
    /// First bar date
    pub start_date: Option<NaiveDate>,
    /// Last bar date
    pub end_date: Option<NaiveDate>,
    /// Number of bars
    pub periods: usize,
    /// First close
    pub start_price: Option<f64>,
    /// Last close
    pub end_price: Option<f64>,
    /// Compounded strategy return over the whole run
    pub total_return: f64,
    /// Total return scaled to one calendar year
    pub annualized_return: Option<f64>,
    /// Return of holding the asset from first to last close
    pub buy_and_hold_return: Option<f64>,
    /// Worst peak-to-trough decline of the cumulative curve (non-positive)
    pub max_drawdown: f64,
    /// Annualized mean excess return over volatility
    pub sharpe_ratio: Option<f64>,
    /// Sample variance of per-period strategy returns
    pub variance: Option<f64>,
    /// Per-period variance times periods per year
    pub annualized_variance: Option<f64>,
    /// Mean per-period return times periods per year
    pub annualized_mean_return: Option<f64>,
    /// Per-period standard deviation times sqrt(periods per year)
    pub annualized_volatility: Option<f64>,
    /// Completed round trips
    pub trade_count: usize,
    /// Share of non-zero strategy returns that are positive
    pub win_rate: Option<f64>,
    /// Whether a position is still open at the last bar
    pub open_trade: bool,
}

impl PerformanceReport {
    /// Metric name to value, undefined metrics as `null`.
    pub fn to_map(&self) -> Result<BTreeMap<String, serde_json::Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(fields) => Ok(fields.into_iter().collect()),
            other => Ok(BTreeMap::from([("report".to_string(), other)])),
        }
    }
}

/// Reduces a return series to a `PerformanceReport`.
#[derive(Debug, Clone, Copy)]
pub struct PerformanceAnalyzer {
    risk_free_rate: f64,
    periods_per_year: u32,
}

impl PerformanceAnalyzer {
    /// Create an analyzer.
    ///
    /// `risk_free_rate` is annual; `periods_per_year` is 52 for weekly bars.
    pub fn new(risk_free_rate: f64, periods_per_year: u32) -> Self {
        Self {
            risk_free_rate,
            periods_per_year,
        }
    }

    /// Compute all metrics.
    pub fn analyze(
        &self,
        prices: &PriceSeries,
        returns: &[ReturnPoint],
        trades: &[Trade],
    ) -> PerformanceReport {
        let strategy_returns = defined_strategy_returns(returns);
        let periods_per_year = f64::from(self.periods_per_year);

        let total = total_return(&strategy_returns);
        let trade_count = trades.iter().filter(|t| t.is_closed()).count();
        let variance = sample_variance(&strategy_returns);

        PerformanceReport {
            symbol: prices.symbol.clone(),
            start_date: prices.first().map(|p| p.timestamp),
            end_date: prices.last().map(|p| p.timestamp),
            periods: prices.len(),
            start_price: prices.first().map(|p| p.close),
            end_price: prices.last().map(|p| p.close),
            total_return: total,
            annualized_return: annualized_return(total, prices.elapsed_years()),
            buy_and_hold_return: buy_and_hold_return(prices),
            max_drawdown: max_drawdown(&cumulative_curve(&strategy_returns)),
            sharpe_ratio: sharpe_ratio(
                &strategy_returns,
                self.risk_free_rate,
                self.periods_per_year,
            ),
            variance,
            annualized_variance: variance.map(|v| v * periods_per_year),
            annualized_mean_return: (strategy_returns.len() >= 2)
                .then(|| mean(&strategy_returns) * periods_per_year),
            annualized_volatility: variance.map(|v| v.sqrt() * periods_per_year.sqrt()),
            trade_count,
            win_rate: win_rate(&strategy_returns, trade_count),
            open_trade: trades.last().map_or(false, |t| !t.is_closed()),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Cumulative growth of one unit: `cum[t] = prod_{s<=t} (1 + r[s])`.
pub fn cumulative_curve(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |growth, r| {
            *growth *= 1.0 + r;
            Some(*growth)
        })
        .collect()
}

/// Compounded return `prod(1 + r) - 1`. Zero for an empty series.
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0
}

/// `(1 + total)^(1 / years) - 1`, undefined when no calendar time elapsed.
pub fn annualized_return(total_return: f64, years: f64) -> Option<f64> {
    if years <= 0.0 {
        return None;
    }
    Some((1.0 + total_return).powf(1.0 / years) - 1.0)
}

/// Last close over first close, minus one.
pub fn buy_and_hold_return(prices: &PriceSeries) -> Option<f64> {
    if prices.len() < 2 {
        return None;
    }
    let first = prices.first()?.close;
    let last = prices.last()?.close;
    if first <= 0.0 {
        return None;
    }
    Some(last / first - 1.0)
}

/// Maximum drawdown as a non-positive fraction (e.g. -0.15 = 15% decline).
///
/// The running peak is the expanding maximum of the curve itself. Zero for
/// an empty or never-declining curve.
pub fn max_drawdown(curve: &[f64]) -> f64 {
    curve
        .iter()
        .scan(f64::NEG_INFINITY, |peak, &value| {
            *peak = peak.max(value);
            Some(if *peak > 0.0 { (value - *peak) / *peak } else { 0.0 })
        })
        .fold(0.0, f64::min)
}

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator), undefined below two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Annualized Sharpe ratio.
///
/// Sharpe = sqrt(P) * mean(r - rf/P) / std(r - rf/P), sample std.
/// Undefined below two returns or when the standard deviation is zero.
/// A standard deviation under `1e-15` counts as zero: constant returns leave
/// rounding residue there, which would otherwise yield an enormous ratio.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: u32) -> Option<f64> {
    let periods = f64::from(periods_per_year);
    if periods <= 0.0 {
        return None;
    }
    let period_rf = risk_free_rate / periods;
    let excess: Vec<f64> = returns.iter().map(|r| r - period_rf).collect();
    let std = sample_variance(&excess)?.sqrt();
    if std < MIN_STD_DEV {
        return None;
    }
    Some(periods.sqrt() * mean(&excess) / std)
}

/// Share of non-zero returns that are positive.
///
/// Undefined when no trade completed or no period had a non-zero return.
pub fn win_rate(returns: &[f64], trade_count: usize) -> Option<f64> {
    if trade_count == 0 {
        return None;
    }
    let active = returns.iter().filter(|&&r| r != 0.0).count();
    if active == 0 {
        return None;
    }
    let winners = returns.iter().filter(|&&r| r > 0.0).count();
    Some(winners as f64 / active as f64)
}
