//! Analysis session: the immutable dataset plus the engine configuration.
//!
//! A session is what a dashboard holds while the user flips between
//! instruments and drags the range. Every query recomputes from the dataset.

use serde::Serialize;

use pricelens_core::{
    summarize, AnalyticsConfig, AnalyticsError, AnnotatedBar, CorrelationMatrix, DisplayRange,
    InstrumentDataset, Summary,
};

/// One instrument viewed through a display range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeView<'a> {
    pub symbol: &'a str,
    pub range: DisplayRange,
    pub bars: &'a [AnnotatedBar],
    /// `None` only for an empty range, which a valid `DisplayRange` rules out.
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    dataset: InstrumentDataset,
    config: AnalyticsConfig,
}

impl AnalysisSession {
    pub fn new(dataset: InstrumentDataset, config: AnalyticsConfig) -> Self {
        Self { dataset, config }
    }

    pub fn dataset(&self) -> &InstrumentDataset {
        &self.dataset
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Trailing window of `default_range_bars` over the instrument.
    /// `None` when the instrument has no bars.
    pub fn default_range(&self, symbol: &str) -> Result<Option<DisplayRange>, AnalyticsError> {
        let bars = self.dataset.get(symbol)?;
        Ok(DisplayRange::trailing(bars.len(), self.config.default_range_bars))
    }

    /// Validated range over the instrument's history.
    pub fn range(&self, symbol: &str, start: usize, end: usize) -> Result<DisplayRange, AnalyticsError> {
        let bars = self.dataset.get(symbol)?;
        DisplayRange::new(start, end, bars.len())
    }

    /// Ranged bars and their summary.
    pub fn view(&self, symbol: &str, range: DisplayRange) -> Result<RangeView<'_>, AnalyticsError> {
        let (symbol, series) = self.lookup(symbol)?;
        let bars = range.slice(series)?;
        Ok(RangeView {
            symbol,
            range,
            bars,
            summary: summarize(bars),
        })
    }

    /// Correlation matrix over every instrument, restricted to the calendar
    /// dates the focused instrument's range covers.
    pub fn correlation(
        &self,
        symbol: &str,
        range: DisplayRange,
    ) -> Result<CorrelationMatrix, AnalyticsError> {
        let series = self.dataset.get(symbol)?;
        let (first, last) = range.dates(series)?;
        CorrelationMatrix::for_dates(&self.dataset, first, last, &self.config.correlation)
    }

    fn lookup(&self, symbol: &str) -> Result<(&str, &[AnnotatedBar]), AnalyticsError> {
        self.dataset
            .iter()
            .find(|(s, _)| *s == symbol)
            .ok_or_else(|| AnalyticsError::UnknownSymbol(symbol.to_string()))
    }
}
