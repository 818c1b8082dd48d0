//! Backtest report generation.

use reversal_core::error::PersistenceError;
use reversal_core::traits::ReportSink;
use reversal_core::types::{BacktestRow, Trade};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{BacktestConfig, PerformanceReport};

const RULE_HEAVY: &str = "═══════════════════════════════════════════════════════════\n";
const RULE_LIGHT: &str = "───────────────────────────────────────────────────────────\n";

/// Complete backtest report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Symbol tested
    pub symbol: String,
    /// Configuration used
    pub config: BacktestConfig,
    /// Performance metrics
    pub performance: PerformanceReport,
    /// Augmented per-bar series
    pub rows: Vec<BacktestRow>,
    /// Round trips, the last one possibly still open
    pub trades: Vec<Trade>,
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}%", v * 100.0))
}

fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn var(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v))
}

impl BacktestReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let p = &self.performance;
        let mut s = String::new();

        s.push_str(RULE_HEAVY);
        s.push_str("                  RSI REVERSAL BACKTEST                     \n");
        s.push_str(RULE_HEAVY);
        s.push('\n');

        s.push_str("SETUP\n");
        s.push_str(RULE_LIGHT);
        s.push_str(&format!("  Symbol:              {}\n", self.symbol));
        s.push_str(&format!(
            "  Period:              {} to {}\n",
            p.start_date.map_or_else(|| "n/a".to_string(), |d| d.to_string()),
            p.end_date.map_or_else(|| "n/a".to_string(), |d| d.to_string()),
        ));
        s.push_str(&format!("  Bars:                {}\n", p.periods));
        s.push_str(&format!(
            "  RSI:                 {} (buy < {}, sell > {})\n",
            self.config.strategy.period,
            self.config.strategy.buy_threshold,
            self.config.strategy.sell_threshold
        ));
        s.push_str(&format!("  Start Price:         {}\n", price(p.start_price)));
        s.push_str(&format!("  End Price:           {}\n", price(p.end_price)));
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str(RULE_LIGHT);
        s.push_str(&format!("  Total Return:        {}\n", pct(Some(p.total_return))));
        s.push_str(&format!("  Annualized Return:   {}\n", pct(p.annualized_return)));
        s.push_str(&format!("  Buy & Hold Return:   {}\n", pct(p.buy_and_hold_return)));
        s.push_str(&format!("  Max Drawdown:        {}\n", pct(Some(p.max_drawdown))));
        s.push('\n');

        s.push_str("RISK METRICS\n");
        s.push_str(RULE_LIGHT);
        s.push_str(&format!("  Sharpe Ratio:        {}\n", ratio(p.sharpe_ratio)));
        s.push_str(&format!("  Variance:            {}\n", var(p.variance)));
        s.push_str(&format!("  Annualized Variance: {}\n", var(p.annualized_variance)));
        s.push_str(&format!("  Annualized Mean:     {}\n", pct(p.annualized_mean_return)));
        s.push_str(&format!("  Annualized Vol:      {}\n", pct(p.annualized_volatility)));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str(RULE_LIGHT);
        s.push_str(&format!("  Completed Trades:    {}\n", p.trade_count));
        s.push_str(&format!("  Win Rate:            {}\n", pct(p.win_rate)));
        s.push_str(&format!(
            "  Open Position:       {}\n",
            if p.open_trade { "yes" } else { "no" }
        ));
        s.push('\n');

        if !self.trades.is_empty() {
            s.push_str("TRADES\n");
            s.push_str(RULE_LIGHT);
            for trade in &self.trades {
                match (trade.exit_date, trade.exit_price) {
                    (Some(exit_date), Some(exit_price)) => s.push_str(&format!(
                        "  {} @ {:.2} -> {} @ {:.2}  {}\n",
                        trade.entry_date,
                        trade.entry_price,
                        exit_date,
                        exit_price,
                        pct(trade.price_return())
                    )),
                    _ => s.push_str(&format!(
                        "  {} @ {:.2} -> open\n",
                        trade.entry_date, trade.entry_price
                    )),
                }
            }
            s.push('\n');
        }

        s.push_str(RULE_HEAVY);

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Hand the augmented series to a sink.
    ///
    /// Failures are logged and returned; the report itself stays usable.
    pub fn write_rows(&self, sink: &dyn ReportSink) -> Result<(), PersistenceError> {
        match sink.write_rows(&self.rows) {
            Ok(()) => {
                info!(target_path = %sink.target(), rows = self.rows.len(), "Results saved");
                Ok(())
            }
            Err(e) => {
                error!(target_path = %sink.target(), error = %e, "Failed to save results");
                Err(e)
            }
        }
    }
}
