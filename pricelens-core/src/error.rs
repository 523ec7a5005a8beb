//! Error taxonomy for the analytics engine.
//!
//! Only caller-side precondition violations are errors. Insufficient data is
//! expressed through `Option` results or the defined zero values, and a
//! numerically degenerate correlation collapses to 0.0.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    #[error("invalid range [{start}, {end}] for a series of {len} bars")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("dates must be strictly increasing: bar {index} ({current}) follows {previous}")]
    NonIncreasingDate {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("non-positive price {price} at bar {index}")]
    NonPositivePrice { index: usize, price: f64 },

    #[error("{name} window must be >= 1 (got {window})")]
    InvalidWindow { name: &'static str, window: usize },

    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = AnalyticsError::InvalidRange {
            start: 5,
            end: 2,
            len: 10,
        };
        assert_eq!(err.to_string(), "invalid range [5, 2] for a series of 10 bars");

        let err = AnalyticsError::UnknownSymbol("XYZ".into());
        assert!(err.to_string().contains("XYZ"));
    }
}
