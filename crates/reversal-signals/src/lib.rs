//! RSI reversal signals and position tracking.
//!
//! This crate provides the decision half of the backtest pipeline:
//! - Threshold signal generation from RSI values (stateless)
//! - The flat/long position state machine (a fold over signals)
//! - Trade extraction from the resulting position sequence
//! - `RsiReversalStrategy`, which chains RSI -> signals -> positions

mod config;
mod position_machine;
mod signal_generator;
mod strategy;

pub use config::RsiReversalConfig;
pub use position_machine::{closed_trade_count, extract_trades, next_position, run_position_machine};
pub use signal_generator::SignalGenerator;
pub use strategy::{RsiReversalStrategy, StrategyOutput};
