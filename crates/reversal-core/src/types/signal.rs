//! Trade intents derived from indicator thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-bar trade intent.
///
/// Signals know nothing about the current position; contradictory or
/// redundant intents are resolved by the position state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// No action
    #[default]
    None,
    /// Oversold, enter long
    Buy,
    /// Overbought, exit long
    Sell,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::None => "none",
            Signal::Buy => "buy",
            Signal::Sell => "sell",
        };
        write!(f, "{}", s)
    }
}
