//! Rolling volatility — population standard deviation of daily returns.
//!
//! Divides by the window size, not window - 1. Not annualized.
//!
//! The first defined value sits at index `window`, not `window - 1`: the
//! anchor return at index 0 is a placeholder, so a full window of real
//! returns first exists once `window` returns follow it.

#[derive(Debug, Clone)]
pub struct Volatility {
    window: usize,
}

impl Volatility {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "volatility window must be >= 1");
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Compute over a daily-return series; `None` for `i < window`.
    pub fn compute(&self, returns: &[f64]) -> Vec<Option<f64>> {
        let n = returns.len();
        let mut result = vec![None; n];

        for i in self.window..n {
            let slice = &returns[(i + 1 - self.window)..=i];
            result[i] = Some(population_std(slice));
        }

        result
    }
}

/// Convenience wrapper over [`Volatility::compute`].
pub fn rolling_volatility(returns: &[f64], window: usize) -> Vec<Option<f64>> {
    Volatility::new(window).compute(returns)
}

/// Population standard deviation. `0.0` for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}
