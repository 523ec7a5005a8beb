//! Daily returns: fractional close-to-close change.
//!
//! The first bar has no prior close and is assigned 0.0 rather than a
//! missing value, so it takes part in monthly sums like any flat day.

use crate::domain::Bar;
use crate::error::AnalyticsError;

/// `(close[i] - close[i-1]) / close[i-1]`, with `0.0` at index 0.
///
/// A non-positive previous close is a caller error and fails the whole call.
pub fn daily_returns(bars: &[Bar]) -> Result<Vec<f64>, AnalyticsError> {
    let mut result = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            result.push(0.0);
            continue;
        }
        let prev = bars[i - 1].close;
        if prev.is_nan() || prev <= 0.0 {
            return Err(AnalyticsError::NonPositivePrice {
                index: i - 1,
                price: prev,
            });
        }
        result.push((bar.close - prev) / prev);
    }
    Ok(result)
}
