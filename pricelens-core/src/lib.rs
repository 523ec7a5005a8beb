//! PriceLens Core — analytics engine for daily OHLCV series.
//!
//! This crate turns raw daily bars into the values a chart dashboard shows:
//! - Domain types (bars, annotated bars, the instrument dataset)
//! - Indicator engine: moving averages, daily returns, rolling volatility
//! - Range selector: the display window over one instrument's history
//! - Summary engine: extrema, volume, monthly returns, crossover signals
//! - Correlation engine: pairwise Pearson correlation of daily returns
//!
//! Everything is synchronous and pure over immutable inputs. Nothing is
//! cached between calls; a new range or instrument selection means a fresh
//! computation.

pub mod config;
pub mod correlation;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod range;
pub mod summary;

pub use config::{AnalyticsConfig, ConfigError, CorrelationConfig, SmaWindows};
pub use correlation::{pair_correlation, pearson, CorrelationMatrix};
pub use domain::{AnnotatedBar, Bar, InstrumentDataset, Symbol};
pub use error::AnalyticsError;
pub use indicators::annotate;
pub use range::{select, DisplayRange};
pub use summary::{summarize, CrossoverCounts, MonthlyReturn, Summary};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: every value handed across threads is Send + Sync.
    ///
    /// Instruments are annotated in parallel by the runner, and the dataset
    /// is shared read-only between sessions.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<AnnotatedBar>();
        require_sync::<AnnotatedBar>();
        require_send::<InstrumentDataset>();
        require_sync::<InstrumentDataset>();
        require_send::<AnalyticsConfig>();
        require_sync::<AnalyticsConfig>();
        require_send::<Summary>();
        require_sync::<Summary>();
        require_send::<CorrelationMatrix>();
        require_sync::<CorrelationMatrix>();
        require_send::<AnalyticsError>();
        require_sync::<AnalyticsError>();
    }
}
