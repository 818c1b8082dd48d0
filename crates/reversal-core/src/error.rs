//! Error types for the backtester.
//!
//! Numeric edge cases (short series, zero variance, zero average loss) are
//! never errors: the pipeline resolves them to `None` or a saturated value.
//! The variants here cover structural failures only.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level backtester error.
#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Strategy parameter errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Data provider errors.
///
/// Any of these is fatal to a run: no report is produced without a usable
/// price series.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP {status} while fetching {symbol}")]
    HttpStatus { status: u16, symbol: String },

    #[error("Response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid close {close} on {date} at index {index}")]
    InvalidPrice {
        index: usize,
        date: NaiveDate,
        close: f64,
    },

    #[error("Timestamps out of order at index {index}: {previous} is not before {current}")]
    Unordered {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },
}

/// Result sink errors.
///
/// A failed write does not invalidate the in-memory report.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_converts() {
        let err: BacktestError = DataError::SymbolNotFound("XYZ".into()).into();
        assert!(matches!(err, BacktestError::Data(_)));
        assert_eq!(err.to_string(), "Data error: Symbol not found: XYZ");
    }

    #[test]
    fn test_invalid_price_message() {
        let err = DataError::InvalidPrice {
            index: 2,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            close: -3.5,
        };
        assert_eq!(err.to_string(), "Invalid close -3.5 on 2024-01-15 at index 2");
    }

    #[test]
    fn test_unordered_message() {
        let err = DataError::Unordered {
            index: 3,
            previous: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            current: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Timestamps out of order at index 3: 2024-01-08 is not before 2024-01-01"
        );
    }
}
