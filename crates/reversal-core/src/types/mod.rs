//! Core data types for the backtester.

mod position;
mod price;
mod row;
mod signal;
mod timeframe;

pub use position::{Position, Trade};
pub use price::{PricePoint, PriceSeries};
pub use row::{BacktestRow, ReturnPoint, RsiPoint};
pub use signal::Signal;
pub use timeframe::Timeframe;
