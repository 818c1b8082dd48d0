//! Core types and traits for the RSI reversal backtester.
//!
//! This crate provides the foundational building blocks including:
//! - Price data types (PricePoint, PriceSeries)
//! - Per-bar pipeline outputs (RsiPoint, Signal, Position, ReturnPoint)
//! - Core traits for indicators, data sources and result sinks

pub mod types;
pub mod traits;
pub mod error;

pub use error::BacktestError;
pub use types::*;
pub use traits::*;
