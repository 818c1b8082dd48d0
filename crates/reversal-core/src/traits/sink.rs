//! Result sink trait definitions.

use crate::error::PersistenceError;
use crate::types::BacktestRow;

/// Destination for the augmented per-bar series.
///
/// Each call overwrites whatever a previous run wrote.
pub trait ReportSink {
    /// Write all rows, oldest first.
    fn write_rows(&self, rows: &[BacktestRow]) -> Result<(), PersistenceError>;

    /// Human-readable description of where rows go.
    fn target(&self) -> String;
}
