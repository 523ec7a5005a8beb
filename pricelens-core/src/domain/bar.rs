//! Bar — one trading day for one instrument.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Daily OHLCV bar.
///
/// Unknown fields are ignored on deserialization, so snapshots that already
/// carry indicator columns load as plain bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Bar whose open, high, low and close are all `price`.
    pub fn flat(date: NaiveDate, price: f64, volume: u64) -> Self {
        Self {
            date,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }

    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// Calendar month key, `YYYY-MM`.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

impl AsRef<Bar> for Bar {
    fn as_ref(&self) -> &Bar {
        self
    }
}

/// Check the per-instrument invariants: strictly increasing dates and
/// positive closes.
///
/// Everything downstream (daily returns in particular) assumes a series that
/// passed this check.
pub fn validate_series(bars: &[Bar]) -> Result<(), AnalyticsError> {
    for (i, bar) in bars.iter().enumerate() {
        if bar.close.is_nan() || bar.close <= 0.0 {
            return Err(AnalyticsError::NonPositivePrice {
                index: i,
                price: bar.close,
            });
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(AnalyticsError::NonIncreasingDate {
                index: i,
                previous: bars[i - 1].date,
                current: bar.date,
            });
        }
    }
    Ok(())
}
