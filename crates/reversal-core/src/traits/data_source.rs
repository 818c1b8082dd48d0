//! Data source trait definitions.

use crate::error::DataError;
use crate::types::{PriceSeries, Timeframe};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for historical price providers.
///
/// Retries, timeouts and rate limiting belong to the implementation; the
/// backtest engine awaits a single call and treats any error as fatal.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch closing prices.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `timeframe` - The sampling interval
    /// * `start` - First date of the range (inclusive)
    /// * `end` - Last date of the range (inclusive)
    ///
    /// # Returns
    /// A series ordered from oldest to newest. It may be empty or short.
    async fn fetch_prices(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource {
        closes: Vec<f64>,
    }

    #[async_trait]
    impl DataSource for FixedSource {
        async fn fetch_prices(
            &self,
            symbol: &str,
            _timeframe: Timeframe,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<PriceSeries, DataError> {
            if self.closes.is_empty() {
                return Err(DataError::SymbolNotFound(symbol.to_string()));
            }
            PriceSeries::weekly_from_closes(symbol, start, &self.closes)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_source_as_trait_object() {
        let source: Box<dyn DataSource> = Box::new(FixedSource {
            closes: vec![1.0, 2.0],
        });
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        let series = source
            .fetch_prices("BTC-USD", Timeframe::Weekly, start, end)
            .await
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(source.name(), "fixed");
    }
}
