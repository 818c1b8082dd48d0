//! Data sources and result sinks.

mod csv_sink;
mod csv_source;
mod yahoo;

pub use csv_sink::{CsvReportSink, RESULT_HEADER};
pub use csv_source::CsvPriceSource;
pub use yahoo::YahooFinanceSource;
