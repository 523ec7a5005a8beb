//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first defined value at index period-1).

use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Number of bars needed before the average is defined.
    pub fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    /// Compute the average for every bar; `None` during warmup.
    pub fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let n = bars.len();
        let mut result = vec![None; n];

        if n < self.period {
            return result;
        }

        // Each output is the plain mean of its own window, so a value never
        // carries rounding drift from bars outside that window.
        for i in self.lookback()..n {
            let window = &bars[(i + 1 - self.period)..=i];
            let sum: f64 = window.iter().map(|b| b.close).sum();
            result[i] = Some(sum / self.period as f64);
        }

        result
    }
}

/// Convenience wrapper over [`Sma::compute`].
pub fn compute_sma(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    Sma::new(period).compute(bars)
}
