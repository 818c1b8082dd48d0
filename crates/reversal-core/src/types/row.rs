//! Per-bar outputs of the pipeline stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Position, Signal};

/// RSI value at a bar, undefined during warmup or when prices did not move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiPoint {
    pub timestamp: NaiveDate,
    pub value: Option<f64>,
}

/// Asset and strategy return for a bar.
///
/// `strategy_return` uses the position held entering the bar, i.e. the one
/// decided at the previous bar. Both are undefined on the first bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub timestamp: NaiveDate,
    pub asset_return: Option<f64>,
    pub strategy_return: Option<f64>,
}

/// One row of the augmented series handed to a result sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestRow {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: Option<f64>,
    pub signal: Signal,
    pub position: Position,
    pub asset_return: Option<f64>,
    pub strategy_return: Option<f64>,
}
