//! Technical indicators with SIMD kernels.
//!
//! This crate provides:
//! - Relative Strength Index over simple moving averages of gains and losses
//! - An index-aligned Simple Moving Average
//! - Vectorised per-step kernels (price deltas, period returns)
//!
//! Every indicator returns one value per input point so results can be
//! zipped back onto the price series by index.

pub mod momentum;
pub mod moving_average;
pub mod simd;

pub use momentum::Rsi;
pub use moving_average::Sma;
