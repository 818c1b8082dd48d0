//! Core traits for the backtester.

mod data_source;
mod indicator;
mod sink;
mod strategy;

pub use data_source::DataSource;
pub use indicator::Indicator;
pub use sink::ReportSink;
pub use strategy::StrategyConfig;
