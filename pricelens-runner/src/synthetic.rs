//! Deterministic synthetic market data.
//!
//! Each instrument drifts geometrically from a start price toward an end
//! price over the calendar span, with uniform noise scaled by its
//! volatility. Only weekdays produce bars. The RNG is seeded from the BLAKE3
//! hash of the symbol, so the same symbol and span always give the same bars.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use pricelens_core::{Bar, Symbol};

/// Shape of one synthetic instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSpec {
    pub symbol: Symbol,
    pub start_price: f64,
    /// Drift target. The daily growth factor spreads `end / start` over the
    /// calendar span but is applied once per weekday bar, so the drift
    /// undershoots this price.
    pub end_price: f64,
    /// Daily noise amplitude as a fraction of price.
    pub volatility: f64,
    /// Mean daily volume; each day draws from `[0.5, 1.5)` times this.
    pub base_volume: u64,
}

impl SyntheticSpec {
    pub fn new(
        symbol: impl Into<Symbol>,
        start_price: f64,
        end_price: f64,
        volatility: f64,
        base_volume: u64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            start_price,
            end_price,
            volatility,
            base_volume,
        }
    }
}

/// First day of the built-in preset.
pub fn preset_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2013, 5, 1).unwrap_or(NaiveDate::MIN)
}

/// Last day of the built-in preset.
pub fn preset_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 5, 31).unwrap_or(NaiveDate::MAX)
}

/// The four-instrument preset: a large-cap growth stock, a steady grower,
/// a highly volatile crypto asset and a moderate grower.
pub fn default_specs() -> Vec<SyntheticSpec> {
    vec![
        SyntheticSpec::new("AMZN", 250.0, 1900.0, 0.02, 3_000_000),
        SyntheticSpec::new("DPZ", 50.0, 280.0, 0.015, 500_000),
        SyntheticSpec::new("BTC", 130.0, 5500.0, 0.05, 10_000_000),
        SyntheticSpec::new("NFLX", 200.0, 360.0, 0.025, 5_000_000),
    ]
}

/// Generate raw bars for every spec over `[start, end]`.
pub fn generate_dataset(
    specs: &[SyntheticSpec],
    start: NaiveDate,
    end: NaiveDate,
) -> BTreeMap<Symbol, Vec<Bar>> {
    warn!(
        instruments = specs.len(),
        %start,
        %end,
        "generating SYNTHETIC market data, not real prices"
    );
    specs
        .iter()
        .map(|spec| (spec.symbol.clone(), generate_bars(spec, start, end)))
        .collect()
}

/// Generate one instrument's bars. Empty when `end < start`.
pub fn generate_bars(spec: &SyntheticSpec, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(spec.symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let total_days = (end - start).num_days().max(1) as f64;
    let daily_growth = (spec.end_price / spec.start_price).powf(1.0 / total_days);

    let mut bars = Vec::new();
    let mut price = spec.start_price;
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        price *= daily_growth;
        price += (rng.gen::<f64>() - 0.5) * 2.0 * spec.volatility * price;

        let open = price * (1.0 + (rng.gen::<f64>() - 0.5) * 0.01);
        let close = price * (1.0 + (rng.gen::<f64>() - 0.5) * 0.01);
        let high = open.max(close) * (1.0 + rng.gen::<f64>() * 0.02);
        let low = open.min(close) * (1.0 - rng.gen::<f64>() * 0.02);
        let volume = (spec.base_volume as f64 * (0.5 + rng.gen::<f64>())) as u64;

        bars.push(Bar {
            date: current,
            open: cents(open),
            high: cents(high),
            low: cents(low),
            close: cents(close),
            volume,
        });

        current += chrono::Duration::days(1);
    }

    bars
}

/// Round to cents, never below one cent.
fn cents(price: f64) -> f64 {
    ((price * 100.0).round() / 100.0).max(0.01)
}
