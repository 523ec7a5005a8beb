//! Instrument dataset — the single source of truth for one analytics session.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::annotated::AnnotatedBar;
use super::Symbol;
use crate::config::AnalyticsConfig;
use crate::domain::Bar;
use crate::error::AnalyticsError;
use crate::indicators::annotate;

/// Symbol → full annotated history.
///
/// Built once at load time and never mutated afterwards; every view handed
/// out is a borrowed slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InstrumentDataset {
    series: BTreeMap<Symbol, Vec<AnnotatedBar>>,
}

impl InstrumentDataset {
    /// Annotate every instrument's raw bars and collect them.
    pub fn build(
        raw: BTreeMap<Symbol, Vec<Bar>>,
        config: &AnalyticsConfig,
    ) -> Result<Self, AnalyticsError> {
        let mut series = BTreeMap::new();
        for (symbol, bars) in raw {
            let annotated = annotate(&bars, config)?;
            series.insert(symbol, annotated);
        }
        Ok(Self { series })
    }

    /// Wrap series that were annotated elsewhere (e.g. in parallel).
    pub fn from_annotated(series: BTreeMap<Symbol, Vec<AnnotatedBar>>) -> Self {
        Self { series }
    }

    /// Symbols in sorted order.
    pub fn symbols(&self) -> Vec<&str> {
        self.series.keys().map(|s| s.as_str()).collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.series.contains_key(symbol)
    }

    /// Full annotated history for a symbol.
    pub fn get(&self, symbol: &str) -> Result<&[AnnotatedBar], AnalyticsError> {
        self.series
            .get(symbol)
            .map(|v| v.as_slice())
            .ok_or_else(|| AnalyticsError::UnknownSymbol(symbol.to_string()))
    }

    /// Bars of `symbol` dated within `[first, last]` inclusive.
    ///
    /// Relies on the strictly increasing date invariant, so the window is a
    /// contiguous slice found by binary search.
    pub fn bars_between(
        &self,
        symbol: &str,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<&[AnnotatedBar], AnalyticsError> {
        let bars = self.get(symbol)?;
        let lo = bars.partition_point(|b| b.date < first);
        let hi = bars.partition_point(|b| b.date <= last);
        Ok(&bars[lo..hi.max(lo)])
    }

    /// Number of instruments.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AnnotatedBar])> {
        self.series.iter().map(|(s, v)| (s.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn dataset() -> InstrumentDataset {
        let mut raw = BTreeMap::new();
        raw.insert("NFLX".to_string(), make_bars(&[10.0, 11.0, 12.0, 13.0]));
        raw.insert("AMZN".to_string(), make_bars(&[5.0, 6.0]));
        InstrumentDataset::build(raw, &AnalyticsConfig::default()).unwrap()
    }

    #[test]
    fn symbols_are_sorted() {
        assert_eq!(dataset().symbols(), vec!["AMZN", "NFLX"]);
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let ds = dataset();
        assert_eq!(
            ds.get("BTC").unwrap_err(),
            AnalyticsError::UnknownSymbol("BTC".into())
        );
    }

    #[test]
    fn build_rejects_invalid_series() {
        let mut raw = BTreeMap::new();
        let mut bars = make_bars(&[10.0, 11.0]);
        bars[1].date = bars[0].date;
        raw.insert("DPZ".to_string(), bars);
        assert!(InstrumentDataset::build(raw, &AnalyticsConfig::default()).is_err());
    }

    #[test]
    fn bars_between_is_inclusive() {
        let ds = dataset();
        let all = ds.get("NFLX").unwrap();
        let window = ds.bars_between("NFLX", all[1].date, all[2].date).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].close, 11.0);
        assert_eq!(window[1].close, 12.0);
    }

    #[test]
    fn bars_between_outside_history_is_empty() {
        let ds = dataset();
        let far = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert!(ds.bars_between("NFLX", far, far).unwrap().is_empty());
    }
}
