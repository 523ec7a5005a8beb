//! Engine configuration: indicator windows, correlation filter, default view.
//!
//! Stored as TOML. Every key is optional; missing keys take the defaults
//! below.
//!
//! ```toml
//! volatility_window = 20
//! default_range_bars = 365
//!
//! [sma]
//! short = 20
//! medium = 50
//! long = 100
//!
//! [correlation]
//! exclude_zero_returns = true
//! zero_threshold = 0.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Moving-average windows. The crossover scan compares `short` against `medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaWindows {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

impl Default for SmaWindows {
    fn default() -> Self {
        Self {
            short: 20,
            medium: 50,
            long: 100,
        }
    }
}

/// Which daily returns take part in pairwise correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// When false every return is kept and `zero_threshold` is ignored.
    pub exclude_zero_returns: bool,
    /// Returns with `|r| <= zero_threshold` are dropped before pairing. The
    /// default of `0.0` drops exactly-zero returns only, which includes the
    /// anchor return of each series.
    pub zero_threshold: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            exclude_zero_returns: true,
            zero_threshold: 0.0,
        }
    }
}

impl CorrelationConfig {
    /// Keep every return.
    pub fn keep_all() -> Self {
        Self {
            exclude_zero_returns: false,
            ..Self::default()
        }
    }

    /// True if `r` survives the filter.
    pub fn keeps(&self, r: f64) -> bool {
        !self.exclude_zero_returns || r.abs() > self.zero_threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub sma: SmaWindows,
    pub volatility_window: usize,
    pub correlation: CorrelationConfig,
    /// Size of the initial display window (most recent bars).
    pub default_range_bars: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            sma: SmaWindows::default(),
            volatility_window: 20,
            correlation: CorrelationConfig::default(),
            default_range_bars: 365,
        }
    }
}

impl AnalyticsConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("sma.short", self.sma.short),
            ("sma.medium", self.sma.medium),
            ("sma.long", self.sma.long),
            ("volatility_window", self.volatility_window),
            ("default_range_bars", self.default_range_bars),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be >= 1")));
            }
        }
        let t = self.correlation.zero_threshold;
        if !t.is_finite() || t < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "correlation.zero_threshold must be finite and >= 0 (got {t})"
            )));
        }
        Ok(())
    }
}
