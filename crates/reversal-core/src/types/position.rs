//! Position and trade types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exposure held at the close of a bar.
///
/// Fully in or fully out; there is no sizing and no short side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// No exposure
    #[default]
    Flat,
    /// One unit of long exposure
    Long,
}

impl Position {
    /// Exposure multiplier applied to the next period's asset return.
    #[inline]
    pub fn exposure(&self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }

    #[inline]
    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::Flat => "flat",
            Position::Long => "long",
        };
        write!(f, "{}", s)
    }
}

/// A round trip recovered from the position sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Bar on which the position was entered
    pub entry_date: NaiveDate,
    /// Close on the entry bar
    pub entry_price: f64,
    /// Bar on which the position was exited, `None` while still open
    pub exit_date: Option<NaiveDate>,
    /// Close on the exit bar
    pub exit_price: Option<f64>,
}

impl Trade {
    /// Open a trade at the given bar.
    pub fn open(entry_date: NaiveDate, entry_price: f64) -> Self {
        Self {
            entry_date,
            entry_price,
            exit_date: None,
            exit_price: None,
        }
    }

    /// Close the trade at the given bar.
    pub fn close(mut self, exit_date: NaiveDate, exit_price: f64) -> Self {
        self.exit_date = Some(exit_date);
        self.exit_price = Some(exit_price);
        self
    }

    /// Check if the trade has been exited.
    pub fn is_closed(&self) -> bool {
        self.exit_date.is_some()
    }

    /// Price return from entry close to exit close.
    ///
    /// `None` for open trades or a non-positive entry price.
    pub fn price_return(&self) -> Option<f64> {
        let exit = self.exit_price?;
        if self.entry_price <= 0.0 {
            return None;
        }
        Some(exit / self.entry_price - 1.0)
    }
}
