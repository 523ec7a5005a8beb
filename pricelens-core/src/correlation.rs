//! Correlation engine — pairwise Pearson correlation of daily returns.
//!
//! Pairing is positional: each side's returns are filtered through
//! [`CorrelationConfig`] and both filtered sequences are truncated to the
//! shorter length. When filtered-out days differ between the two
//! instruments, returns from different dates end up paired. This is a known
//! approximation and is kept as is.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::CorrelationConfig;
use crate::domain::{AnnotatedBar, InstrumentDataset, Symbol};
use crate::error::AnalyticsError;

/// Pearson's r over two equal-length samples.
///
/// Fewer than two samples, or a NaN result (zero variance on either side),
/// yields 0.0. Extra trailing samples on the longer side are ignored.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let (a, b) = (&a[..n], &b[..n]);

    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let r = cov / (var_a * var_b).sqrt();
    if r.is_nan() {
        0.0
    } else {
        r
    }
}

/// Filtered, length-aligned return sequences for a pair of instruments.
pub fn paired_returns(
    a: &[AnnotatedBar],
    b: &[AnnotatedBar],
    filter: &CorrelationConfig,
) -> (Vec<f64>, Vec<f64>) {
    let mut ra: Vec<f64> = a.iter().map(|x| x.daily_return).filter(|r| filter.keeps(*r)).collect();
    let mut rb: Vec<f64> = b.iter().map(|x| x.daily_return).filter(|r| filter.keeps(*r)).collect();
    let n = ra.len().min(rb.len());
    ra.truncate(n);
    rb.truncate(n);
    (ra, rb)
}

/// Correlation of two ranged return series under the pairing rules above.
pub fn pair_correlation(a: &[AnnotatedBar], b: &[AnnotatedBar], filter: &CorrelationConfig) -> f64 {
    let (ra, rb) = paired_returns(a, b, filter);
    pearson(&ra, &rb)
}

/// Symmetric instrument × instrument matrix with an exact 1.0 diagonal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CorrelationMatrix {
    values: BTreeMap<Symbol, BTreeMap<Symbol, f64>>,
}

impl CorrelationMatrix {
    /// Compute the matrix for named, already-ranged series.
    ///
    /// Each unordered pair is computed once and mirrored, so the result is
    /// symmetric by construction.
    pub fn compute<'a, I>(series: I, filter: &CorrelationConfig) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [AnnotatedBar])>,
    {
        let series: Vec<(&str, &[AnnotatedBar])> = series.into_iter().collect();
        let mut values: BTreeMap<Symbol, BTreeMap<Symbol, f64>> = BTreeMap::new();

        for (i, (sym_a, bars_a)) in series.iter().enumerate() {
            values
                .entry(sym_a.to_string())
                .or_default()
                .insert(sym_a.to_string(), 1.0);
            for (sym_b, bars_b) in &series[i + 1..] {
                let r = pair_correlation(bars_a, bars_b, filter);
                values
                    .entry(sym_a.to_string())
                    .or_default()
                    .insert(sym_b.to_string(), r);
                values
                    .entry(sym_b.to_string())
                    .or_default()
                    .insert(sym_a.to_string(), r);
            }
        }

        Self { values }
    }

    /// Matrix over every instrument in `dataset`, each restricted to the
    /// bars dated within `[first, last]`.
    pub fn for_dates(
        dataset: &InstrumentDataset,
        first: NaiveDate,
        last: NaiveDate,
        filter: &CorrelationConfig,
    ) -> Result<Self, AnalyticsError> {
        let mut series = Vec::with_capacity(dataset.len());
        for symbol in dataset.symbols() {
            series.push((symbol, dataset.bars_between(symbol, first, last)?));
        }
        Ok(Self::compute(series, filter))
    }

    /// Coefficient for a pair, `None` if either symbol is absent.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.values.get(a).and_then(|row| row.get(b)).copied()
    }

    /// Symbols in sorted order.
    pub fn symbols(&self) -> Vec<&str> {
        self.values.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
