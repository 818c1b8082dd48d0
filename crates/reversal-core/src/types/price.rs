//! Closing-price series types.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Timeframe;
use crate::error::DataError;

const DAYS_PER_YEAR: f64 = 365.25;

/// A single closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Bar date
    pub timestamp: NaiveDate,
    /// Closing price
    pub close: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(timestamp: NaiveDate, close: f64) -> Self {
        Self { timestamp, close }
    }

    /// Whether the close is positive and finite.
    pub fn has_valid_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// Chronologically ordered closes for one symbol.
///
/// Timestamps are strictly increasing and every close is positive and
/// finite. The series may be empty or shorter
/// than an indicator's warmup; downstream stages degrade to undefined values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Sampling interval
    pub timeframe: Timeframe,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting duplicate or out-of-order timestamps and
    /// closes that are zero, negative or not finite.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        points: Vec<PricePoint>,
    ) -> Result<Self, DataError> {
        if let Some((index, point)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !p.has_valid_close())
        {
            return Err(DataError::InvalidPrice {
                index,
                date: point.timestamp,
                close: point.close,
            });
        }

        if let Some(index) = points
            .windows(2)
            .position(|w| w[0].timestamp >= w[1].timestamp)
        {
            return Err(DataError::Unordered {
                index: index + 1,
                previous: points[index].timestamp,
                current: points[index + 1].timestamp,
            });
        }

        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            points,
        })
    }

    /// Create an empty series.
    pub fn empty(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            points: Vec::new(),
        }
    }

    /// Build a weekly series from closes, one week apart starting at `start`.
    pub fn weekly_from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, DataError> {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(start + Duration::weeks(i as i64), close))
            .collect();
        Self::new(symbol, Timeframe::Weekly, points)
    }

    /// Get the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get all points as a slice.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Get a point by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    /// Get the first point.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Get the last point.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Calendar time between the first and last point, in years.
    ///
    /// Zero for series with fewer than two points.
    pub fn elapsed_years(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => {
                (last.timestamp - first.timestamp).num_days() as f64 / DAYS_PER_YEAR
            }
            _ => 0.0,
        }
    }

    /// Get an iterator over the points.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_unordered() {
        let points = vec![
            PricePoint::new(date(2024, 1, 1), 10.0),
            PricePoint::new(date(2024, 1, 8), 11.0),
            PricePoint::new(date(2024, 1, 8), 12.0),
        ];
        let err = PriceSeries::new("BTC-USD", Timeframe::Weekly, points).unwrap_err();
        assert!(matches!(err, DataError::Unordered { index: 2, .. }));
    }

    #[test]
    fn test_accepts_gaps() {
        let points = vec![
            PricePoint::new(date(2024, 1, 1), 10.0),
            PricePoint::new(date(2024, 1, 22), 11.0),
        ];
        let series = PriceSeries::new("BTC-USD", Timeframe::Weekly, points).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_rejects_non_positive_close() {
        let points = vec![
            PricePoint::new(date(2024, 1, 1), 10.0),
            PricePoint::new(date(2024, 1, 8), 0.0),
        ];
        let err = PriceSeries::new("BTC-USD", Timeframe::Weekly, points).unwrap_err();
        assert!(matches!(err, DataError::InvalidPrice { index: 1, close, .. } if close == 0.0));

        let err = PriceSeries::weekly_from_closes("TEST", date(2024, 1, 1), &[10.0, 5.0, -5.0])
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidPrice { index: 2, .. }));
    }

    #[test]
    fn test_rejects_non_finite_close() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = PriceSeries::weekly_from_closes("TEST", date(2024, 1, 1), &[1.0, bad]);
            assert!(matches!(result, Err(DataError::InvalidPrice { index: 1, .. })));
        }
    }

    #[test]
    fn test_weekly_from_closes() {
        let series =
            PriceSeries::weekly_from_closes("TEST", date(2024, 1, 1), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.last().unwrap().timestamp, date(2024, 1, 15));
        assert_eq!(series.timeframe, Timeframe::Weekly);
    }

    #[test]
    fn test_elapsed_years() {
        let series = PriceSeries::weekly_from_closes("TEST", date(2020, 1, 1), &[1.0; 53]).unwrap();
        assert!((series.elapsed_years() - 364.0 / 365.25).abs() < 1e-12);

        let single = PriceSeries::weekly_from_closes("TEST", date(2020, 1, 1), &[1.0]).unwrap();
        assert_eq!(single.elapsed_years(), 0.0);
        assert_eq!(PriceSeries::empty("TEST", Timeframe::Weekly).elapsed_years(), 0.0);
    }
}
