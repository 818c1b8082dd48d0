//! Backtesting engine.
//!
//! Turns a price series into an augmented per-bar table and a
//! `PerformanceReport`. Every stage is a pure function of its input.

mod engine;
mod report;
mod returns;
mod statistics;

pub use engine::{BacktestConfig, BacktestEngine};
pub use report::BacktestReport;
pub use returns::{calculate_returns, defined_strategy_returns};
pub use statistics::{PerformanceAnalyzer, PerformanceReport};
