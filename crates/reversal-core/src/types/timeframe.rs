//! Sampling interval definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling interval for closing prices.
///
/// The backtest runs on weekly bars only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    /// Weekly bars
    #[serde(rename = "1w")]
    #[default]
    Weekly,
}

impl Timeframe {
    /// Number of bars in a calendar year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Timeframe::Weekly => 52,
        }
    }

    /// Interval code used by the Yahoo Finance chart API.
    pub fn yahoo_interval(&self) -> &'static str {
        match self {
            Timeframe::Weekly => "1wk",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Weekly => write!(f, "1w"),
        }
    }
}
