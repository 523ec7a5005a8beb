//! PriceLens Runner — everything that feeds or drains the analytics engine.
//!
//! This crate builds on `pricelens-core` to provide:
//! - Dataset loading from JSON snapshots, per-instrument CSV and wide CSV
//! - Deterministic synthetic market data
//! - Parallel per-instrument annotation
//! - The analysis session that owns the loaded dataset
//! - JSON, CSV and Markdown export

pub mod data_loader;
pub mod export;
pub mod session;
pub mod synthetic;

pub use data_loader::{build_dataset, load_dataset, load_raw, InputFormat, LoadError};
pub use export::{
    export_bars_csv, export_correlation_csv, export_dataset_json, export_summary_json,
    export_summary_markdown, write_artifact, ExportError,
};
pub use session::{AnalysisSession, RangeView};
pub use synthetic::{default_specs, generate_bars, generate_dataset, SyntheticSpec};
