//! Yahoo Finance price provider.
//!
//! Pulls closes from the v8 chart API. The endpoint is unofficial and changes
//! without notice, so every structural surprise maps to
//! `DataError::ResponseFormatChanged` rather than a panic.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::{Client, StatusCode};
use reversal_core::error::DataError;
use reversal_core::traits::DataSource;
use reversal_core::types::{PricePoint, PriceSeries, Timeframe};
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance chart API client.
pub struct YahooFinanceSource {
    client: Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooFinanceSource {
    /// Create a client with a 30 second request timeout.
    pub fn new() -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Point the client at another host (a mirror or a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the number of retries after the first attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn chart_url(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> String {
        let period1 = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        // Inclusive end date: request up to the last second of that day
        let period2 = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp() + 86_399;
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval={}&events=history",
            self.base_url,
            symbol,
            period1,
            period2,
            timeframe.yahoo_interval()
        )
    }

    async fn fetch_with_retry(&self, url: &str, symbol: &str) -> Result<ChartResponse, DataError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!(
                    symbol,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying chart request"
                );
                tokio::time::sleep(delay).await;
            }

            let resp = match self.client.get(url).send().await {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    warn!(symbol, attempt, error = %e, "Chart request failed");
                    last_error = Some(DataError::NetworkError(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkError(e.to_string())),
            };

            let status = resp.status();
            if status == StatusCode::NOT_FOUND {
                return Err(DataError::SymbolNotFound(symbol.to_string()));
            }
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                warn!(
                    symbol,
                    attempt,
                    status = status.as_u16(),
                    "Chart request throttled or failed"
                );
                last_error = Some(DataError::HttpStatus {
                    status: status.as_u16(),
                    symbol: symbol.to_string(),
                });
                continue;
            }
            if !status.is_success() {
                return Err(DataError::HttpStatus {
                    status: status.as_u16(),
                    symbol: symbol.to_string(),
                });
            }

            return resp.json::<ChartResponse>().await.map_err(|e| {
                DataError::ResponseFormatChanged(format!(
                    "failed to parse response for {}: {}",
                    symbol, e
                ))
            });
        }

        Err(last_error.unwrap_or_else(|| DataError::NetworkError("max retries exceeded".into())))
    }
}

/// Turn a chart response into ordered closes.
///
/// Rows with a null, zero or negative close are skipped. A repeated date
/// keeps the later row, which Yahoo uses for the in-progress period.
fn parse_response(
    symbol: &str,
    timeframe: Timeframe,
    resp: ChartResponse,
) -> Result<PriceSeries, DataError> {
    let result = match (resp.chart.result, resp.chart.error) {
        (Some(result), _) => result,
        (None, Some(err)) if err.code == "Not Found" => {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }
        (None, Some(err)) => {
            return Err(DataError::ResponseFormatChanged(format!(
                "{}: {}",
                err.code, err.description
            )));
        }
        (None, None) => {
            return Err(DataError::ResponseFormatChanged(
                "empty result with no error".into(),
            ));
        }
    };

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

    // No timestamps means no bars in the requested range
    let Some(timestamps) = data.timestamp else {
        return Ok(PriceSeries::empty(symbol, timeframe));
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    let mut points: Vec<PricePoint> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        let date = DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {}", ts)))?;

        let point = PricePoint::new(date, close);
        if !point.has_valid_close() {
            warn!(symbol, %date, close, "Skipping invalid close");
            continue;
        }

        match points.last_mut() {
            Some(last) if last.timestamp == date => *last = point,
            _ => points.push(point),
        }
    }

    PriceSeries::new(symbol, timeframe, points)
}

#[async_trait]
impl DataSource for YahooFinanceSource {
    async fn fetch_prices(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let url = self.chart_url(symbol, timeframe, start, end);
        debug!(symbol, %url, "Requesting chart");

        let chart = self.fetch_with_retry(&url, symbol).await?;
        let series = parse_response(symbol, timeframe, chart)?;

        debug!(symbol, bars = series.len(), "Chart parsed");
        Ok(series)
    }

    fn name(&self) -> &str {
        "yahoo_finance"
    }
}
