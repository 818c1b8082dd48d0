//! CSV price source for offline runs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use reversal_core::error::DataError;
use reversal_core::traits::DataSource;
use reversal_core::types::{PricePoint, PriceSeries, Timeframe};
use serde::Deserialize;
use tracing::debug;

/// CSV record format. Columns other than date and close are ignored.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Close", default)]
    close: Option<f64>,
    #[serde(rename = "Adj Close", default)]
    adj_close: Option<f64>,
}

/// Reads `Date,...,Close` files such as a Yahoo Finance export.
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    /// Create a new CSV price source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::ParseError(format!(
                "Price file not found: {}",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load every row, sorted by date.
    ///
    /// `Close` is preferred over `Adj Close`. Rows with neither are skipped.
    /// Duplicate dates and zero, negative or non-finite closes are rejected.
    pub fn load_all(&self, symbol: &str, timeframe: Timeframe) -> Result<PriceSeries, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut points = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let Some(close) = record.close.or(record.adj_close) else {
                continue;
            };
            points.push(PricePoint::new(parse_date(&record.date)?, close));
        }

        points.sort_by_key(|p| p.timestamp);
        PriceSeries::new(symbol, timeframe, points)
    }
}

/// Parse the date formats seen in exported price files.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let date_str = date_str.trim();

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[async_trait]
impl DataSource for CsvPriceSource {
    async fn fetch_prices(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let all = self.load_all(symbol, timeframe)?;
        let points: Vec<PricePoint> = all
            .iter()
            .filter(|p| p.timestamp >= start && p.timestamp <= end)
            .copied()
            .collect();

        debug!(
            path = %self.path.display(),
            total = all.len(),
            in_range = points.len(),
            "Loaded prices from CSV"
        );
        PriceSeries::new(symbol, timeframe, points)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024/01/15").unwrap(), expected);
        assert_eq!(parse_date("01/15/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 10:30:00").unwrap(), expected);
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(CsvPriceSource::new("/nonexistent/prices.csv").is_err());
    }

    #[test]
    fn test_load_yahoo_export() {
        let file = write_file(
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2017-01-15,1,1,1,821.8,821.8,100\n\
             2017-01-01,1,1,1,998.3,998.3,100\n\
             2017-01-08,1,1,1,,,0\n",
        );
        let series = CsvPriceSource::new(file.path())
            .unwrap()
            .load_all("BTC-USD", Timeframe::Weekly)
            .unwrap();

        // Sorted and the empty close skipped
        assert_eq!(series.closes(), vec![998.3, 821.8]);
        assert_eq!(series.symbol, "BTC-USD");
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let file = write_file("date,close\n2017-01-01,1.0\n2017-01-01,2.0\n");
        let result = CsvPriceSource::new(file.path())
            .unwrap()
            .load_all("X", Timeframe::Weekly);
        assert!(matches!(result, Err(DataError::Unordered { .. })));
    }

    #[test]
    fn test_negative_close_rejected() {
        let file = write_file("date,close\n2017-01-01,1.0\n2017-01-08,-2.0\n");
        let result = CsvPriceSource::new(file.path())
            .unwrap()
            .load_all("X", Timeframe::Weekly);
        assert!(matches!(
            result,
            Err(DataError::InvalidPrice { index: 1, close, .. }) if close == -2.0
        ));
    }

    #[tokio::test]
    async fn test_fetch_filters_range() {
        let file = write_file(
            "date,close\n2017-01-01,1.0\n2017-01-08,2.0\n2017-01-15,3.0\n2017-01-22,4.0\n",
        );
        let source = CsvPriceSource::new(file.path()).unwrap();
        let series = source
            .fetch_prices(
                "X",
                Timeframe::Weekly,
                NaiveDate::from_ymd_opt(2017, 1, 8).unwrap(),
                NaiveDate::from_ymd_opt(2017, 1, 15).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(series.closes(), vec![2.0, 3.0]);
    }
}
