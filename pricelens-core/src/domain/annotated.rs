//! Annotated bar — a raw bar plus the indicator values computed over its
//! instrument's full history.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

use super::bar::Bar;

/// A [`Bar`] carrying its precomputed indicators.
///
/// The three moving averages follow the configured short/medium/long windows
/// (20/50/100 by default). Indicator values are computed over the full
/// history, never over a display range, so a ranged view still shows the
/// averages a chart of the whole series would.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedBar {
    #[serde(flatten)]
    pub bar: Bar,
    #[serde(alias = "sma20")]
    pub sma_short: Option<f64>,
    #[serde(alias = "sma50")]
    pub sma_medium: Option<f64>,
    #[serde(alias = "sma100")]
    pub sma_long: Option<f64>,
    pub daily_return: f64,
    pub volatility: Option<f64>,
}

impl AnnotatedBar {
    /// Short and medium averages, if both are defined.
    pub fn crossover_pair(&self) -> Option<(f64, f64)> {
        Some((self.sma_short?, self.sma_medium?))
    }
}

impl Deref for AnnotatedBar {
    type Target = Bar;

    fn deref(&self) -> &Bar {
        &self.bar
    }
}

impl AsRef<Bar> for AnnotatedBar {
    fn as_ref(&self) -> &Bar {
        &self.bar
    }
}
