//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for a single symbol.
///
/// Serialized with capitalized keys (`Date`, `Open`, ...) so the markup
/// dataset reads like the provider's own tabular output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if every price field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.prices().iter().all(|p| p.is_finite())
    }

    /// Returns true if every price field is finite and strictly positive.
    pub fn has_valid_prices(&self) -> bool {
        self.prices().iter().all(|p| p.is_finite() && *p > 0.0)
    }

    fn prices(&self) -> [f64; 4] {
        [self.open, self.high, self.low, self.close]
    }
}

/// An ordered run of bars for one symbol, ascending by date.
pub type Series = Vec<Bar>;
