//! One indicator pass over an instrument's full history.

use super::{daily_returns, Sma, Volatility};
use crate::config::AnalyticsConfig;
use crate::domain::{validate_series, AnnotatedBar, Bar};
use crate::error::AnalyticsError;

/// Validate `bars` and attach every configured indicator.
///
/// Returns are computed before volatility; the averages are independent of
/// both. Output has the same length and order as the input.
pub fn annotate(bars: &[Bar], config: &AnalyticsConfig) -> Result<Vec<AnnotatedBar>, AnalyticsError> {
    validate_series(bars)?;
    for (name, window) in [
        ("sma.short", config.sma.short),
        ("sma.medium", config.sma.medium),
        ("sma.long", config.sma.long),
        ("volatility", config.volatility_window),
    ] {
        if window == 0 {
            return Err(AnalyticsError::InvalidWindow { name, window });
        }
    }

    let sma_short = Sma::new(config.sma.short).compute(bars);
    let sma_medium = Sma::new(config.sma.medium).compute(bars);
    let sma_long = Sma::new(config.sma.long).compute(bars);
    let returns = daily_returns(bars)?;
    let volatility = Volatility::new(config.volatility_window).compute(&returns);

    Ok(bars
        .iter()
        .enumerate()
        .map(|(i, bar)| AnnotatedBar {
            bar: bar.clone(),
            sma_short: sma_short[i],
            sma_medium: sma_medium[i],
            sma_long: sma_long[i],
            daily_return: returns[i],
            volatility: volatility[i],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn annotation_preserves_length_and_bars() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let annotated = annotate(&bars, &AnalyticsConfig::default()).unwrap();
        assert_eq!(annotated.len(), 3);
        for (a, b) in annotated.iter().zip(&bars) {
            assert_eq!(&a.bar, b);
        }
    }

    #[test]
    fn indicator_warmup_follows_config() {
        let mut config = AnalyticsConfig::default();
        config.sma.short = 2;
        config.sma.medium = 3;
        config.sma.long = 4;
        config.volatility_window = 2;

        let annotated = annotate(&make_bars(&[10.0, 11.0, 12.0, 13.0]), &config).unwrap();
        assert_eq!(annotated[0].sma_short, None);
        assert_eq!(annotated[1].sma_short, Some(10.5));
        assert_eq!(annotated[1].sma_medium, None);
        assert_eq!(annotated[2].sma_medium, Some(11.0));
        assert_eq!(annotated[2].sma_long, None);
        assert_eq!(annotated[3].sma_long, Some(11.5));
        assert_eq!(annotated[1].volatility, None);
        assert!(annotated[2].volatility.is_some());
        assert_eq!(annotated[0].daily_return, 0.0);
    }

    #[test]
    fn zero_window_is_rejected() {
        let mut config = AnalyticsConfig::default();
        config.volatility_window = 0;
        assert_eq!(
            annotate(&make_bars(&[1.0]), &config).unwrap_err(),
            AnalyticsError::InvalidWindow {
                name: "volatility",
                window: 0
            }
        );
    }

    #[test]
    fn empty_series_annotates_to_empty() {
        assert!(annotate(&[], &AnalyticsConfig::default()).unwrap().is_empty());
    }
}
