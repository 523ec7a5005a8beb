//! Summary engine — scalar insights over a ranged, annotated series.
//!
//! Every statistic here is scoped to the slice it is given. Ties always
//! resolve to the earliest bar or month.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::AnnotatedBar;

/// Summed daily returns for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    /// `YYYY-MM`
    pub month: String,
    pub total_return: f64,
}

/// Moving-average crossover counts (short vs medium average).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossoverCounts {
    pub bullish: usize,
    pub bearish: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub highest_price: f64,
    pub highest_price_date: NaiveDate,
    pub lowest_price: f64,
    pub lowest_price_date: NaiveDate,
    pub current_price: f64,
    /// Last close minus the one before it; `None` for a single-bar range.
    pub price_change: Option<f64>,
    pub price_change_percent: Option<f64>,
    pub avg_volume: f64,
    /// Largest defined volatility in range, 0.0 if none is defined.
    pub max_volatility: f64,
    pub best_month: MonthlyReturn,
    pub worst_month: MonthlyReturn,
    pub bullish_signals: usize,
    pub bearish_signals: usize,
}

/// Summarize a ranged series. An empty range has no summary.
pub fn summarize(bars: &[AnnotatedBar]) -> Option<Summary> {
    let last = bars.last()?;

    let (hi_idx, lo_idx) = extreme_close_indices(bars);
    let (price_change, price_change_percent) = match bars.len() {
        0 | 1 => (None, None),
        n => {
            let prev = bars[n - 2].close;
            let change = last.close - prev;
            (Some(change), Some(change / prev * 100.0))
        }
    };

    let total_volume: f64 = bars.iter().map(|b| b.volume as f64).sum();
    let max_volatility = bars
        .iter()
        .filter_map(|b| b.volatility)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(0.0);

    let months = monthly_returns(bars);
    let (best_month, worst_month) = extreme_months(&months)?;
    let signals = count_crossovers(bars);

    Some(Summary {
        highest_price: bars[hi_idx].close,
        highest_price_date: bars[hi_idx].date,
        lowest_price: bars[lo_idx].close,
        lowest_price_date: bars[lo_idx].date,
        current_price: last.close,
        price_change,
        price_change_percent,
        avg_volume: total_volume / bars.len() as f64,
        max_volatility,
        best_month,
        worst_month,
        bullish_signals: signals.bullish,
        bearish_signals: signals.bearish,
    })
}

/// Indices of the first highest and first lowest close.
fn extreme_close_indices(bars: &[AnnotatedBar]) -> (usize, usize) {
    let mut hi = 0;
    let mut lo = 0;
    for (i, bar) in bars.iter().enumerate().skip(1) {
        if bar.close > bars[hi].close {
            hi = i;
        }
        if bar.close < bars[lo].close {
            lo = i;
        }
    }
    (hi, lo)
}

/// Sum daily returns per `YYYY-MM`, months in order of first appearance.
pub fn monthly_returns(bars: &[AnnotatedBar]) -> Vec<MonthlyReturn> {
    let mut months: Vec<MonthlyReturn> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for bar in bars {
        let key = bar.month_key();
        match index.get(&key) {
            Some(&i) => months[i].total_return += bar.daily_return,
            None => {
                index.insert(key.clone(), months.len());
                months.push(MonthlyReturn {
                    month: key,
                    total_return: bar.daily_return,
                });
            }
        }
    }

    months
}

/// Best and worst month. A later month only replaces the current pick when
/// it is strictly better (or worse), so the earliest month wins ties.
pub fn extreme_months(months: &[MonthlyReturn]) -> Option<(MonthlyReturn, MonthlyReturn)> {
    let first = months.first()?;
    let mut best = first;
    let mut worst = first;
    for m in &months[1..] {
        if m.total_return > best.total_return {
            best = m;
        }
        if m.total_return < worst.total_return {
            worst = m;
        }
    }
    Some((best.clone(), worst.clone()))
}

/// Count short/medium average crossovers between consecutive bars.
///
/// Only pairs where both averages are defined on both bars are considered.
/// Bullish: `prev.short <= prev.medium` and `curr.short > curr.medium`.
/// Bearish: `prev.short >= prev.medium` and `curr.short < curr.medium`.
/// A prior bar sitting exactly on the medium average counts as not yet
/// crossed in either direction.
pub fn count_crossovers(bars: &[AnnotatedBar]) -> CrossoverCounts {
    let mut counts = CrossoverCounts::default();
    for pair in bars.windows(2) {
        let (Some((ps, pm)), Some((cs, cm))) = (pair[0].crossover_pair(), pair[1].crossover_pair())
        else {
            continue;
        };
        if ps <= pm && cs > cm {
            counts.bullish += 1;
        }
        if ps >= pm && cs < cm {
            counts.bearish += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;

    fn bar(date: &str, close: f64, volume: u64) -> AnnotatedBar {
        AnnotatedBar {
            bar: Bar::flat(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), close, volume),
            sma_short: None,
            sma_medium: None,
            sma_long: None,
            daily_return: 0.0,
            volatility: None,
        }
    }

    fn with_averages(short: f64, medium: f64) -> AnnotatedBar {
        let mut b = bar("2020-01-01", 10.0, 1);
        b.sma_short = Some(short);
        b.sma_medium = Some(medium);
        b
    }

    #[test]
    fn empty_range_has_no_summary() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn extrema_take_first_date_on_ties() {
        let bars = vec![
            bar("2020-01-02", 10.0, 1),
            bar("2020-01-03", 12.0, 1),
            bar("2020-01-06", 8.0, 1),
            bar("2020-01-07", 12.0, 1),
            bar("2020-01-08", 8.0, 1),
        ];
        let s = summarize(&bars).unwrap();
        assert_eq!(s.highest_price, 12.0);
        assert_eq!(s.highest_price_date.to_string(), "2020-01-03");
        assert_eq!(s.lowest_price, 8.0);
        assert_eq!(s.lowest_price_date.to_string(), "2020-01-06");
        assert_eq!(s.current_price, 8.0);
    }

    #[test]
    fn average_volume_and_price_change() {
        let bars = vec![bar("2020-01-02", 100.0, 100), bar("2020-01-03", 110.0, 300)];
        let s = summarize(&bars).unwrap();
        assert_eq!(s.avg_volume, 200.0);
        assert_eq!(s.price_change, Some(10.0));
        assert_eq!(s.price_change_percent, Some(10.0));
    }

    #[test]
    fn single_bar_has_no_price_change() {
        let s = summarize(&[bar("2020-01-02", 100.0, 5)]).unwrap();
        assert_eq!(s.price_change, None);
        assert_eq!(s.price_change_percent, None);
        assert_eq!(s.best_month.month, "2020-01");
        assert_eq!(s.worst_month.month, "2020-01");
    }

    #[test]
    fn max_volatility_ignores_missing_and_defaults_to_zero() {
        let mut bars = vec![bar("2020-01-02", 1.0, 1), bar("2020-01-03", 1.0, 1)];
        assert_eq!(summarize(&bars).unwrap().max_volatility, 0.0);

        bars[1].volatility = Some(0.03);
        assert_eq!(summarize(&bars).unwrap().max_volatility, 0.03);
    }

    #[test]
    fn monthly_returns_group_by_calendar_month() {
        let mut bars = vec![
            bar("2018-01-30", 1.0, 1),
            bar("2018-01-31", 1.0, 1),
            bar("2018-02-01", 1.0, 1),
        ];
        bars[0].daily_return = 0.25;
        bars[1].daily_return = 0.5;
        bars[2].daily_return = -0.125;

        let months = monthly_returns(&bars);
        assert_eq!(
            months,
            vec![
                MonthlyReturn { month: "2018-01".into(), total_return: 0.75 },
                MonthlyReturn { month: "2018-02".into(), total_return: -0.125 },
            ]
        );
    }

    #[test]
    fn best_month_keeps_first_maximizer() {
        let months = vec![
            MonthlyReturn { month: "2018-01".into(), total_return: 0.10 },
            MonthlyReturn { month: "2018-02".into(), total_return: -0.05 },
            MonthlyReturn { month: "2018-03".into(), total_return: 0.10 },
        ];
        let (best, worst) = extreme_months(&months).unwrap();
        assert_eq!(best.month, "2018-01");
        assert_eq!(worst.month, "2018-02");
    }

    #[test]
    fn worst_month_keeps_first_minimizer() {
        let months = vec![
            MonthlyReturn { month: "2018-01".into(), total_return: -0.2 },
            MonthlyReturn { month: "2018-02".into(), total_return: -0.2 },
        ];
        let (_, worst) = extreme_months(&months).unwrap();
        assert_eq!(worst.month, "2018-01");
        assert!(extreme_months(&[]).is_none());
    }

    #[test]
    fn equal_then_greater_is_bullish() {
        let counts = count_crossovers(&[with_averages(1.0, 1.0), with_averages(2.0, 1.0)]);
        assert_eq!(counts, CrossoverCounts { bullish: 1, bearish: 0 });
    }

    #[test]
    fn greater_then_equal_is_not_bearish() {
        let counts = count_crossovers(&[with_averages(2.0, 1.0), with_averages(1.0, 1.0)]);
        assert_eq!(counts, CrossoverCounts::default());
    }

    #[test]
    fn equal_then_less_is_bearish() {
        let counts = count_crossovers(&[with_averages(1.0, 1.0), with_averages(0.5, 1.0)]);
        assert_eq!(counts, CrossoverCounts { bullish: 0, bearish: 1 });
    }

    #[test]
    fn pairs_with_missing_averages_are_skipped() {
        let mut warmup = with_averages(1.0, 2.0);
        warmup.sma_medium = None;
        let counts = count_crossovers(&[warmup, with_averages(3.0, 2.0)]);
        assert_eq!(counts, CrossoverCounts::default());
    }

    #[test]
    fn round_trip_cross_counts_both_directions() {
        let bars = vec![
            with_averages(1.0, 2.0),
            with_averages(3.0, 2.0),
            with_averages(1.0, 2.0),
        ];
        let s = summarize(&bars).unwrap();
        assert_eq!((s.bullish_signals, s.bearish_signals), (1, 1));
    }
}
