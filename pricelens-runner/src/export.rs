//! Reporting and export — JSON, CSV, and Markdown artifact generation.
//!
//! - **JSON**: annotated dataset snapshot and summary documents
//! - **CSV**: ranged annotated bars and the correlation matrix
//! - **Markdown**: the summary as a readable report
//!
//! The render functions return strings; [`write_artifact`] puts one on disk.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use pricelens_core::{AnnotatedBar, CorrelationMatrix, InstrumentDataset, Summary};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer: {0}")]
    CsvBuffer(String),

    #[error("write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

// ─── JSON export ────────────────────────────────────────────────────

/// Pretty JSON snapshot of every annotated instrument.
///
/// Output is readable by the JSON snapshot loader; the indicator fields are
/// ignored on load and recomputed.
pub fn export_dataset_json(dataset: &InstrumentDataset) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(dataset)?)
}

pub fn export_summary_json(summary: &Summary) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(summary)?)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Ranged annotated bars as CSV.
///
/// Columns: date, open, high, low, close, volume, sma_short, sma_medium,
/// sma_long, daily_return, volatility. Undefined indicators are empty cells.
/// Numbers are written in their shortest exact form, so the file reloads
/// through the long CSV loader without losing precision.
pub fn export_bars_csv(bars: &[AnnotatedBar]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "sma_short",
        "sma_medium",
        "sma_long",
        "daily_return",
        "volatility",
    ])?;

    for b in bars {
        wtr.write_record([
            b.date.to_string(),
            b.open.to_string(),
            b.high.to_string(),
            b.low.to_string(),
            b.close.to_string(),
            b.volume.to_string(),
            exact(b.sma_short),
            exact(b.sma_medium),
            exact(b.sma_long),
            b.daily_return.to_string(),
            exact(b.volatility),
        ])?;
    }

    finish_csv(wtr)
}

/// Correlation matrix as CSV: a `symbol` header followed by every symbol,
/// then one row per symbol.
pub fn export_correlation_csv(matrix: &CorrelationMatrix) -> Result<String, ExportError> {
    let symbols = matrix.symbols();
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["symbol".to_string()];
    header.extend(symbols.iter().map(|s| s.to_string()));
    wtr.write_record(&header)?;

    for a in &symbols {
        let mut row = vec![a.to_string()];
        row.extend(symbols.iter().map(|b| optional(matrix.get(a, b), 4)));
        wtr.write_record(&row)?;
    }

    finish_csv(wtr)
}

fn exact(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(String::new, |v| format!("{v:.decimals$}"))
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::CsvBuffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::CsvBuffer(e.to_string()))
}

// ─── Markdown report ────────────────────────────────────────────────

/// Summary rendered as a Markdown report.
pub fn export_summary_markdown(symbol: &str, summary: &Summary) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {symbol} Summary\n\n"));

    md.push_str("## Price\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Current | ${:.2} |\n", summary.current_price));
    if let (Some(change), Some(pct)) = (summary.price_change, summary.price_change_percent) {
        md.push_str(&format!("| Change | {change:+.2} ({pct:+.2}%) |\n"));
    }
    md.push_str(&format!(
        "| Highest | ${:.2} on {} |\n",
        summary.highest_price, summary.highest_price_date
    ));
    md.push_str(&format!(
        "| Lowest | ${:.2} on {} |\n\n",
        summary.lowest_price, summary.lowest_price_date
    ));

    md.push_str("## Activity\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Avg Volume | {:.0} |\n", summary.avg_volume));
    md.push_str(&format!(
        "| Max Volatility | {:.2}% |\n\n",
        summary.max_volatility * 100.0
    ));

    md.push_str("## Monthly Performance\n\n");
    md.push_str(&format!(
        "- Best month: {} ({:+.2}%)\n",
        summary.best_month.month,
        summary.best_month.total_return * 100.0
    ));
    md.push_str(&format!(
        "- Worst month: {} ({:+.2}%)\n\n",
        summary.worst_month.month,
        summary.worst_month.total_return * 100.0
    ));

    md.push_str("## Signals\n\n");
    md.push_str(&format!("- Bullish crossovers: {}\n", summary.bullish_signals));
    md.push_str(&format!("- Bearish crossovers: {}\n", summary.bearish_signals));

    md
}

// ─── Files ──────────────────────────────────────────────────────────

/// Write a rendered artifact, creating parent directories.
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), ExportError> {
    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)?;
    info!(path = %path.display(), bytes = contents.len(), "artifact written");
    Ok(())
}
