//! Range selector — the viewing window over one instrument's history.
//!
//! Summary and correlation work on the selected slice only. Indicator values
//! inside the slice were computed on the full history beforehand.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::error::AnalyticsError;

/// Inclusive, 0-based index bounds: `0 <= start <= end <= len - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRange {
    start: usize,
    end: usize,
}

impl DisplayRange {
    /// Validated range over a series of `len` bars.
    pub fn new(start: usize, end: usize, len: usize) -> Result<Self, AnalyticsError> {
        if start > end || end >= len {
            return Err(AnalyticsError::InvalidRange { start, end, len });
        }
        Ok(Self { start, end })
    }

    /// The whole series; `None` when it is empty.
    pub fn full(len: usize) -> Option<Self> {
        len.checked_sub(1).map(|end| Self { start: 0, end })
    }

    /// The most recent `n` bars (all of them if fewer); `None` when empty.
    pub fn trailing(len: usize, n: usize) -> Option<Self> {
        let end = len.checked_sub(1)?;
        Some(Self {
            start: len.saturating_sub(n),
            end,
        })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of bars covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false: a range covers at least one bar.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Borrow the covered bars.
    pub fn slice<'a, T>(&self, series: &'a [T]) -> Result<&'a [T], AnalyticsError> {
        select(series, self.start, self.end)
    }

    /// First and last calendar dates covered.
    pub fn dates<B: AsRef<Bar>>(&self, series: &[B]) -> Result<(NaiveDate, NaiveDate), AnalyticsError> {
        let view = self.slice(series)?;
        // A validated slice holds at least one bar.
        let first = view[0].as_ref().date;
        let last = view[view.len() - 1].as_ref().date;
        Ok((first, last))
    }
}

/// `series[start..=end]` as a borrowed view. Out-of-bounds or reversed
/// indices are a caller error.
pub fn select<T>(series: &[T], start: usize, end: usize) -> Result<&[T], AnalyticsError> {
    if start > end || end >= series.len() {
        return Err(AnalyticsError::InvalidRange {
            start,
            end,
            len: series.len(),
        });
    }
    Ok(&series[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn select_is_inclusive() {
        let data = [1, 2, 3, 4, 5];
        assert_eq!(select(&data, 1, 3).unwrap(), &[2, 3, 4]);
        assert_eq!(select(&data, 4, 4).unwrap(), &[5]);
    }

    #[test]
    fn select_rejects_out_of_bounds() {
        let data = [1, 2, 3];
        assert_eq!(
            select(&data, 0, 3).unwrap_err(),
            AnalyticsError::InvalidRange { start: 0, end: 3, len: 3 }
        );
        assert!(select(&data, 2, 1).is_err());
        assert!(select::<i32>(&[], 0, 0).is_err());
    }

    #[test]
    fn new_enforces_invariant() {
        assert!(DisplayRange::new(0, 9, 10).is_ok());
        assert!(DisplayRange::new(3, 2, 10).is_err());
        assert!(DisplayRange::new(0, 10, 10).is_err());
    }

    #[test]
    fn trailing_window_matches_dashboard_default() {
        let r = DisplayRange::trailing(1000, 365).unwrap();
        assert_eq!((r.start(), r.end()), (635, 999));
        assert_eq!(r.len(), 365);

        let short = DisplayRange::trailing(100, 365).unwrap();
        assert_eq!((short.start(), short.end()), (0, 99));

        assert!(DisplayRange::trailing(0, 365).is_none());
        assert!(DisplayRange::full(0).is_none());
    }

    #[test]
    fn dates_reports_bounds() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0]);
        let r = DisplayRange::new(1, 2, bars.len()).unwrap();
        let (first, last) = r.dates(&bars).unwrap();
        assert_eq!(first, bars[1].date);
        assert_eq!(last, bars[2].date);
    }
}
