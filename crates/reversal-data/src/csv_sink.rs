//! CSV result sink.

use std::path::{Path, PathBuf};

use reversal_core::error::PersistenceError;
use reversal_core::traits::ReportSink;
use reversal_core::types::BacktestRow;

/// Column order of the results file.
pub const RESULT_HEADER: [&str; 7] = [
    "date",
    "close",
    "rsi",
    "signal",
    "position",
    "asset_return",
    "strategy_return",
];

/// Writes the augmented series to a CSV file, replacing any previous run.
///
/// Undefined values are written as empty cells.
pub struct CsvReportSink {
    path: PathBuf,
}

impl CsvReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportSink for CsvReportSink {
    fn write_rows(&self, rows: &[BacktestRow]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut writer = csv::Writer::from_path(&self.path)
            .map_err(|e| PersistenceError::Csv(e.to_string()))?;

        writer
            .write_record(RESULT_HEADER)
            .map_err(|e| PersistenceError::Csv(e.to_string()))?;

        for row in rows {
            writer
                .write_record([
                    row.date.to_string(),
                    row.close.to_string(),
                    cell(row.rsi),
                    row.signal.to_string(),
                    row.position.to_string(),
                    cell(row.asset_return),
                    cell(row.strategy_return),
                ])
                .map_err(|e| PersistenceError::Csv(e.to_string()))?;
        }

        writer.flush().map_err(|e| self.io_error(e))
    }

    fn target(&self) -> String {
        self.path.display().to_string()
    }
}
