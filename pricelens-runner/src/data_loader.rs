//! Dataset loading.
//!
//! Reads raw bars from one of three layouts and annotates every instrument:
//! 1. JSON snapshot — `{ "SYM": [ {date, open, high, low, close, volume}, ... ] }`.
//!    Precomputed indicator fields in the snapshot are ignored.
//! 2. Long CSV — one file per instrument, `Date,Open,High,Low,Close,Volume`,
//!    symbol taken from the file stem. A directory loads every `*.csv` in it.
//! 3. Wide CSV — `Date,SYM1,SYM2,...` close prices only. Each price becomes a
//!    flat bar with a fixed volume; blank or unparseable cells are skipped
//!    for that instrument only.
//!
//! Annotation runs in parallel across instruments.

use chrono::NaiveDate;
use pricelens_core::{annotate, AnalyticsConfig, AnalyticsError, Bar, InstrumentDataset, Symbol};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Volume assigned to bars read from a close-only wide CSV.
pub const WIDE_CSV_VOLUME: u64 = 1_000_000;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("parse JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid {field} value '{value}'")]
    InvalidField {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("cannot derive a symbol from '{0}'")]
    NoSymbol(String),

    #[error("symbol {symbol} is provided by more than one file (second: {path})")]
    DuplicateSymbol { symbol: Symbol, path: String },

    #[error("no instruments found in {0}")]
    Empty(String),

    #[error("instrument {symbol}: {source}")]
    InvalidSeries {
        symbol: Symbol,
        source: AnalyticsError,
    },

    #[error("unknown input format '{0}' (expected json, csv or wide)")]
    UnknownFormat(String),
}

/// Input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Json,
    Csv,
    Wide,
}

impl InputFormat {
    /// Guess from the path: directories and `.csv` files are long CSV,
    /// anything else is a JSON snapshot. Wide CSV must be requested.
    pub fn detect(path: &Path) -> Self {
        if path.is_dir() {
            return Self::Csv;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

impl FromStr for InputFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "wide" => Ok(Self::Wide),
            other => Err(LoadError::UnknownFormat(other.to_string())),
        }
    }
}

/// Load raw bars and annotate them into a dataset.
///
/// This is the primary entry point for turning a file on disk into a session.
pub fn load_dataset(
    path: &Path,
    format: Option<InputFormat>,
    config: &AnalyticsConfig,
) -> Result<InstrumentDataset, LoadError> {
    let format = format.unwrap_or_else(|| InputFormat::detect(path));
    let raw = load_raw(path, format)?;
    if raw.is_empty() {
        return Err(LoadError::Empty(path.display().to_string()));
    }
    let dataset = build_dataset(raw, config)?;
    info!(
        path = %path.display(),
        ?format,
        instruments = dataset.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Read raw bars without annotating them.
pub fn load_raw(path: &Path, format: InputFormat) -> Result<BTreeMap<Symbol, Vec<Bar>>, LoadError> {
    match format {
        InputFormat::Json => parse_json_snapshot(&read_to_string(path)?),
        InputFormat::Csv if path.is_dir() => read_csv_dir(path),
        InputFormat::Csv => {
            let symbol = symbol_from_path(path)?;
            let bars = parse_long_csv(open(path)?)?;
            Ok(BTreeMap::from([(symbol, bars)]))
        }
        InputFormat::Wide => parse_wide_csv(open(path)?),
    }
}

/// Annotate every instrument in parallel.
pub fn build_dataset(
    raw: BTreeMap<Symbol, Vec<Bar>>,
    config: &AnalyticsConfig,
) -> Result<InstrumentDataset, LoadError> {
    let series: Result<BTreeMap<Symbol, _>, LoadError> = raw
        .into_par_iter()
        .map(|(symbol, bars)| {
            let annotated = annotate(&bars, config).map_err(|source| LoadError::InvalidSeries {
                symbol: symbol.clone(),
                source,
            })?;
            debug!(symbol = %symbol, bars = annotated.len(), "annotated instrument");
            Ok((symbol, annotated))
        })
        .collect();
    Ok(InstrumentDataset::from_annotated(series?))
}

/// Parse a JSON snapshot document.
pub fn parse_json_snapshot(json: &str) -> Result<BTreeMap<Symbol, Vec<Bar>>, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse one instrument from a long CSV.
///
/// Header names are matched case-insensitively. `Date` and `Close` are
/// required; missing `Open`/`High`/`Low` fall back to the close and a
/// missing `Volume` to 0.
pub fn parse_long_csv<R: Read>(reader: R) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let date_col = column("date").ok_or(LoadError::MissingColumn("date"))?;
    let close_col = column("close").ok_or(LoadError::MissingColumn("close"))?;
    let open_col = column("open");
    let high_col = column("high");
    let low_col = column("low");
    let volume_col = column("volume");

    let mut bars = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let row = i + 2;
        let field = |col: usize| record.get(col).unwrap_or("");

        let date = parse_date(field(date_col), row)?;
        let close = parse_price(field(close_col), row, "close")?;
        let price_or_close = |col: Option<usize>, name: &'static str| match col {
            Some(c) => parse_price(field(c), row, name),
            None => Ok(close),
        };
        let volume = match volume_col.map(field) {
            None | Some("") => 0,
            Some(v) => parse_volume(v, row)?,
        };

        bars.push(Bar {
            date,
            open: price_or_close(open_col, "open")?,
            high: price_or_close(high_col, "high")?,
            low: price_or_close(low_col, "low")?,
            close,
            volume,
        });
    }

    Ok(bars)
}

/// Parse a wide close-only CSV: first column date, one column per symbol.
pub fn parse_wide_csv<R: Read>(reader: R) -> Result<BTreeMap<Symbol, Vec<Bar>>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let symbols: Vec<Symbol> = headers.iter().skip(1).map(str::to_string).collect();
    if symbols.is_empty() {
        return Err(LoadError::MissingColumn("symbol"));
    }

    let mut out: BTreeMap<Symbol, Vec<Bar>> =
        symbols.iter().map(|s| (s.clone(), Vec::new())).collect();
    let mut skipped = 0usize;

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 2;
        let date = parse_date(record.get(0).unwrap_or(""), row)?;
        for (j, symbol) in symbols.iter().enumerate() {
            match record.get(j + 1).map(str::parse::<f64>) {
                Some(Ok(price)) if price.is_finite() => {
                    if let Some(bars) = out.get_mut(symbol) {
                        bars.push(Bar::flat(date, price, WIDE_CSV_VOLUME));
                    }
                }
                _ => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "wide CSV cells without a usable price were skipped");
    }
    out.retain(|_, bars| !bars.is_empty());
    Ok(out)
}

/// Every `*.csv` file in `dir`, one instrument per file.
fn read_csv_dir(dir: &Path) -> Result<BTreeMap<Symbol, Vec<Bar>>, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut out = BTreeMap::new();
    for entry in entries {
        let path = entry
            .map_err(|source| LoadError::Io {
                path: dir.display().to_string(),
                source,
            })?
            .path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        let symbol = symbol_from_path(&path)?;
        let bars = parse_long_csv(open(&path)?)?;
        debug!(symbol = %symbol, bars = bars.len(), "read instrument CSV");
        if out.contains_key(&symbol) {
            return Err(LoadError::DuplicateSymbol {
                symbol,
                path: path.display().to_string(),
            });
        }
        out.insert(symbol, bars);
    }
    Ok(out)
}

fn symbol_from_path(path: &Path) -> Result<Symbol, LoadError> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_uppercase())
        .ok_or_else(|| LoadError::NoSymbol(path.display().to_string()))
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn read_to_string(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate, LoadError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| LoadError::InvalidField {
        row,
        field: "date",
        value: value.to_string(),
    })
}

fn parse_price(value: &str, row: usize, field: &'static str) -> Result<f64, LoadError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| LoadError::InvalidField {
            row,
            field,
            value: value.to_string(),
        })
}

/// Volumes are integers, but some exports write them as `1234.0`.
/// Fractional, negative or out-of-range values are rejected.
fn parse_volume(value: &str, row: usize) -> Result<u64, LoadError> {
    value
        .parse::<u64>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| {
                    v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v < u64::MAX as f64
                })
                .map(|v| v as u64)
        })
        .ok_or_else(|| LoadError::InvalidField {
            row,
            field: "volume",
            value: value.to_string(),
        })
}
