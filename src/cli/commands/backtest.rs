//! Backtest command implementation.

use anyhow::{Context, Result};
use chrono::Utc;
use reversal_backtest::{BacktestEngine, BacktestReport};
use reversal_config::AppConfig;
use reversal_core::traits::DataSource;
use reversal_core::types::Timeframe;
use reversal_data::{CsvPriceSource, CsvReportSink, YahooFinanceSource};
use tracing::info;

use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, mut config: AppConfig) -> Result<()> {
    apply_overrides(&args, &mut config);

    let today = Utc::now().date_naive();
    config.validate(today)?;

    let settings = &config.backtest;
    let start = settings.start;
    let end = settings.end_date(today);
    let engine = BacktestEngine::new(settings.to_backtest_config())?;

    let source: Box<dyn DataSource> = match &args.data {
        Some(path) => Box::new(CsvPriceSource::new(path)?),
        None => Box::new(YahooFinanceSource::new()?),
    };

    info!(symbol = %settings.symbol, %start, %end, source = source.name(), "Starting backtest");

    // Provider failures are fatal: nothing is printed or written
    let report = engine
        .fetch_and_run(source.as_ref(), &settings.symbol, Timeframe::Weekly, start, end)
        .await
        .with_context(|| format!("Failed to fetch prices for {}", settings.symbol))?;

    let persisted = if config.output.write_results {
        let sink = CsvReportSink::new(&config.output.results_path);
        report.write_rows(&sink)
    } else {
        Ok(())
    };

    print_report(&report, args.output)?;

    if let Some(save_path) = &args.save_report {
        let json = report.to_json()?;
        std::fs::write(save_path, json)
            .with_context(|| format!("Failed to save report to {}", save_path.display()))?;
        info!("Report saved to {:?}", save_path);
    }

    persisted.with_context(|| {
        format!(
            "Failed to write results to {}",
            config.output.results_path.display()
        )
    })
}

fn apply_overrides(args: &BacktestArgs, config: &mut AppConfig) {
    let backtest = &mut config.backtest;
    if let Some(symbol) = &args.symbol {
        backtest.symbol = symbol.clone();
    }
    if let Some(start) = args.start {
        backtest.start = start;
    }
    if let Some(end) = args.end {
        backtest.end = Some(end);
    }
    if let Some(period) = args.period {
        backtest.rsi_period = period;
    }
    if let Some(buy) = args.buy {
        backtest.buy_threshold = buy;
    }
    if let Some(sell) = args.sell {
        backtest.sell_threshold = sell;
    }
    if let Some(rate) = args.risk_free {
        backtest.risk_free_rate = rate;
    }
    if let Some(periods) = args.periods_per_year {
        backtest.periods_per_year = periods;
    }

    if let Some(path) = &args.results {
        config.output.results_path = path.clone();
    }
    if args.no_results {
        config.output.write_results = false;
    }
}

fn print_report(report: &BacktestReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = report.performance.to_map()?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{}", report.summary());
        }
    }
    Ok(())
}
